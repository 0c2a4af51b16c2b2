use std::collections::HashSet;

use crate::{
    types::Track,
    utils::{TRACK_URI_PREFIX, normalize_artist, track_url},
};

/// Upper bound on the fallback list before artist deduplication.
pub const MAX_FALLBACK_TRACKS: usize = 15;

/// Tracks borrowed from each of the other two pools.
const BORROWED_PER_POOL: usize = 2;

struct PoolTrack {
    id: &'static str,
    title: &'static str,
    artist: &'static str,
    image: &'static str,
    preview: &'static str,
}

static HIGH_ENERGY: [PoolTrack; 5] = [
    PoolTrack {
        id: "7hQJA50XrCWABAu5v6QZ4i",
        title: "Don't Stop Me Now",
        artist: "Queen",
        image: "ab67616d0000b273008b06d5de6c2916b9081b4f",
        preview: "5a12483aa3b51331aba663131dbac3831a0cb5d0",
    },
    PoolTrack {
        id: "32OlwWuMpZ6b0aN2RZOeMS",
        title: "Uptown Funk",
        artist: "Mark Ronson ft. Bruno Mars",
        image: "ab67616d0000b273e7d1c50e01b72a9d6bf9d892",
        preview: "4eb779428cb39d819c9b444e7cb7d7f2fabb68e6",
    },
    PoolTrack {
        id: "2tUBqZG2AbRi7Q0BIrVrEj",
        title: "I Wanna Dance with Somebody",
        artist: "Whitney Houston",
        image: "ab67616d0000b273256ff8a1dce3ef9f0b5627e8",
        preview: "8d5a2c33d7b82c2d5a77b28cc4a90e3b37a1e220",
    },
    PoolTrack {
        id: "1WkMMavIMc4JZ8cfMmxHkI",
        title: "Can't Stop the Feeling!",
        artist: "Justin Timberlake",
        image: "ab67616d0000b2738c14b0194a7fa4b6139c4c87",
        preview: "8fcdae257b0d349e5691a4e4a069c27cae80629e",
    },
    PoolTrack {
        id: "3Yh9lZcWyKrK9GjbhuS0hT",
        title: "Good as Hell",
        artist: "Lizzo",
        image: "ab67616d0000b273e4f9c263d7651e0e29a114da",
        preview: "c3c56a817e70a7d7e6e1a5373dd62397cdbf18c4",
    },
];

static MEDIUM_ENERGY: [PoolTrack; 5] = [
    PoolTrack {
        id: "5jzKL4BDMClWqRguW5qZvh",
        title: "Teenage Dream",
        artist: "Katy Perry",
        image: "ab67616d0000b273af9b92a688cba10078a83742",
        preview: "c3a06e3b023e1d7ecd153228d3ec4fe6be148aac",
    },
    PoolTrack {
        id: "1dGr1c8CrMLDpV6mPbImSI",
        title: "Lover",
        artist: "Taylor Swift",
        image: "ab67616d0000b27314fbbf10e91af2acc6fc3862",
        preview: "70c1e780849fe04b4555a5340c4373be84abe657",
    },
    PoolTrack {
        id: "6UelLqGlWMcVH1E5c4H7lY",
        title: "Watermelon Sugar",
        artist: "Harry Styles",
        image: "ab67616d0000b273b1c579c84122f7cb2455e0db",
        preview: "5c31d1845d0cee23f1c097c659f43b8b27c501ee",
    },
    PoolTrack {
        id: "21jGcNKet2qwijlDFuPiPb",
        title: "Circles",
        artist: "Post Malone",
        image: "ab67616d0000b2739478c87599550dd73bfa7e02",
        preview: "9cb3c8b7ccb399c2c5346ac424cc59be9fef3c98",
    },
    PoolTrack {
        id: "3jjujdWJ72nww5eGnfs2E7",
        title: "Adore You",
        artist: "Harry Styles",
        image: "ab67616d0000b273d9195b2c7d442bc85d30320d",
        preview: "2a606e7fbd0917e3dfdfd9d9a734af12e6d4971e",
    },
];

static LOW_ENERGY: [PoolTrack; 5] = [
    PoolTrack {
        id: "4R2kfaDFhslZEMJqAFNpdd",
        title: "Cardigan",
        artist: "Taylor Swift",
        image: "ab67616d0000b2733ebcf0e922e8f68492bf5a51",
        preview: "cf808afb96444e27cf3c6d6dc5c4b24a8bc694e3",
    },
    PoolTrack {
        id: "7qEHsqek33rTcFNT9PFqLf",
        title: "Someone You Loved",
        artist: "Lewis Capaldi",
        image: "ab67616d0000b273fc2101e6889d6ce9025f85f2",
        preview: "6ed5646d0e5b96bf9e929ce295b7bda6352cb9a8",
    },
    PoolTrack {
        id: "43zdsphuZLzwA9k4DJhU0I",
        title: "When the Party's Over",
        artist: "Billie Eilish",
        image: "ab67616d0000b27350a3147b4edd7701a876c6ce",
        preview: "949e5868e84b1c94d12b5798252de9f3d6cf64f1",
    },
    PoolTrack {
        id: "3Hl9FgFEm4gFteAhxwpEp2",
        title: "River",
        artist: "Leon Bridges",
        image: "ab67616d0000b273f9f0dd245eafc8f6bc707cbd",
        preview: "15cbc72e3a01c1532cef28209f602e7ff2a6c34d",
    },
    PoolTrack {
        id: "4xqrdfXkTW4T0RauPLv3WA",
        title: "Heather",
        artist: "Conan Gray",
        image: "ab67616d0000b2736955098c3fac3c7c80254f07",
        preview: "6bdf46e6bd952a8edf3cc7eebd4eefff44a3eb88",
    },
];

impl PoolTrack {
    fn to_track(&self) -> Track {
        Track {
            id: self.id.to_string(),
            title: self.title.to_string(),
            artist: self.artist.to_string(),
            uri: format!("{}{}", TRACK_URI_PREFIX, self.id),
            album_image: Some(format!("https://i.scdn.co/image/{}", self.image)),
            preview_url: Some(format!("https://p.scdn.co/mp3-preview/{}", self.preview)),
            external_url: track_url(self.id),
        }
    }
}

/// Built-in tracks for an energy level. Never empty, one track per artist.
///
/// The pool matching the energy level comes first, followed by the first two
/// tracks of each other pool for variety.
pub fn fallback_tracks(energy_level: u8) -> Vec<Track> {
    let (selected, others): (&[PoolTrack], [&[PoolTrack]; 2]) = match energy_level {
        0..=3 => (&LOW_ENERGY, [&HIGH_ENERGY, &MEDIUM_ENERGY]),
        4..=7 => (&MEDIUM_ENERGY, [&HIGH_ENERGY, &LOW_ENERGY]),
        _ => (&HIGH_ENERGY, [&MEDIUM_ENERGY, &LOW_ENERGY]),
    };

    let mut artists = HashSet::new();
    selected
        .iter()
        .chain(
            others
                .iter()
                .flat_map(|pool| pool.iter().take(BORROWED_PER_POOL)),
        )
        .take(MAX_FALLBACK_TRACKS)
        .filter(|t| artists.insert(normalize_artist(t.artist)))
        .map(PoolTrack::to_track)
        .collect()
}
