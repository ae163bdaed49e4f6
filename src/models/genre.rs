use serde::{Deserialize, Serialize};

/// TMDB genre vocabulary used by the genre-discovery strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    Animation,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Family,
    Fantasy,
    History,
    Horror,
    Music,
    Mystery,
    Romance,
    SciFi,
    TvMovie,
    Thriller,
    War,
    Western,
}

impl Genre {
    /// TMDB numeric genre id
    pub fn id(&self) -> i32 {
        match self {
            Genre::Action => 28,
            Genre::Adventure => 12,
            Genre::Animation => 16,
            Genre::Comedy => 35,
            Genre::Crime => 80,
            Genre::Documentary => 99,
            Genre::Drama => 18,
            Genre::Family => 10751,
            Genre::Fantasy => 14,
            Genre::History => 36,
            Genre::Horror => 27,
            Genre::Music => 10402,
            Genre::Mystery => 9648,
            Genre::Romance => 10749,
            Genre::SciFi => 878,
            Genre::TvMovie => 10770,
            Genre::Thriller => 53,
            Genre::War => 10752,
            Genre::Western => 37,
        }
    }

    pub fn from_id(id: i32) -> Option<Genre> {
        match id {
            28 => Some(Genre::Action),
            12 => Some(Genre::Adventure),
            16 => Some(Genre::Animation),
            35 => Some(Genre::Comedy),
            80 => Some(Genre::Crime),
            99 => Some(Genre::Documentary),
            18 => Some(Genre::Drama),
            10751 => Some(Genre::Family),
            14 => Some(Genre::Fantasy),
            36 => Some(Genre::History),
            27 => Some(Genre::Horror),
            10402 => Some(Genre::Music),
            9648 => Some(Genre::Mystery),
            10749 => Some(Genre::Romance),
            878 => Some(Genre::SciFi),
            10770 => Some(Genre::TvMovie),
            53 => Some(Genre::Thriller),
            10752 => Some(Genre::War),
            37 => Some(Genre::Western),
            _ => None,
        }
    }

    /// Deterministic keyword fallback for when the LLM genre mapping is
    /// unusable. Scans the mood text for known substrings; an empty match set
    /// defaults to {Drama, Comedy}.
    pub fn from_mood_keywords(mood: &str) -> Vec<Genre> {
        const TABLE: &[(&str, Genre)] = &[
            ("funny", Genre::Comedy),
            ("laugh", Genre::Comedy),
            ("comedy", Genre::Comedy),
            ("sad", Genre::Drama),
            ("cry", Genre::Drama),
            ("scary", Genre::Horror),
            ("horror", Genre::Horror),
            ("action", Genre::Action),
            ("adrenaline", Genre::Action),
            ("love", Genre::Romance),
            ("romantic", Genre::Romance),
            ("space", Genre::SciFi),
        ];

        let lowered = mood.to_lowercase();
        let mut genres = Vec::new();
        for (keyword, genre) in TABLE {
            if lowered.contains(keyword) && !genres.contains(genre) {
                genres.push(*genre);
            }
        }

        if genres.is_empty() {
            genres = vec![Genre::Drama, Genre::Comedy];
        }
        genres
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[Genre] = &[
        Genre::Action,
        Genre::Adventure,
        Genre::Animation,
        Genre::Comedy,
        Genre::Crime,
        Genre::Documentary,
        Genre::Drama,
        Genre::Family,
        Genre::Fantasy,
        Genre::History,
        Genre::Horror,
        Genre::Music,
        Genre::Mystery,
        Genre::Romance,
        Genre::SciFi,
        Genre::TvMovie,
        Genre::Thriller,
        Genre::War,
        Genre::Western,
    ];

    #[test]
    fn test_id_round_trip() {
        for genre in ALL {
            assert_eq!(Genre::from_id(genre.id()), Some(*genre));
        }
    }

    #[test]
    fn test_from_id_unknown() {
        assert_eq!(Genre::from_id(12345), None);
    }

    #[test]
    fn test_keyword_scary_maps_to_horror() {
        let genres = Genre::from_mood_keywords("something scary for tonight");
        assert_eq!(genres, vec![Genre::Horror]);
        assert_eq!(genres[0].id(), 27);
    }

    #[test]
    fn test_keyword_multiple_matches_no_duplicates() {
        let genres = Genre::from_mood_keywords("funny laugh out loud comedy");
        assert_eq!(genres, vec![Genre::Comedy]);
    }

    #[test]
    fn test_keyword_default_when_no_match() {
        let genres = Genre::from_mood_keywords("contemplative autumn evening");
        assert_eq!(genres, vec![Genre::Drama, Genre::Comedy]);
    }
}
