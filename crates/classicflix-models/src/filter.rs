use serde::{Deserialize, Serialize};

/// Snapshot of the active catalog filters. `None` means "no constraint".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default)]
    pub search_query: String,
    pub selected_genre: Option<String>,
    pub selected_language: Option<String>,
    pub selected_year: Option<i32>,
    pub selected_decade: Option<i32>,
    /// Rating category id, see [`RatingCategory`]
    pub selected_rating: Option<String>,
    pub selected_color: Option<String>,
    pub selected_theme: Option<String>,
    pub selected_source: Option<String>,
    pub selected_duration: Option<DurationCategory>,
    pub has_subtitles: Option<bool>,
    pub selected_director: Option<String>,
    pub selected_award: Option<String>,
    #[serde(default)]
    pub has_poster_only: bool,
    /// Entry of the "most watched" list, e.g. "3. Nosferatu"
    pub selected_top30: Option<String>,
}

impl FilterState {
    /// True when at least one predicate constrains the catalog
    pub fn is_active(&self) -> bool {
        !self.search_query.trim().is_empty()
            || self.selected_genre.is_some()
            || self.selected_language.is_some()
            || self.selected_year.is_some()
            || self.selected_decade.is_some()
            || self.selected_rating.is_some()
            || self.selected_color.is_some()
            || self.selected_theme.is_some()
            || self.selected_source.is_some()
            || self.selected_duration.is_some()
            || self.has_subtitles.is_some()
            || self.selected_director.is_some()
            || self.selected_award.is_some()
            || self.has_poster_only
            || self.selected_top30.is_some()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DurationCategory {
    VeryShort,
    Short,
    Medium,
    Long,
    Giant,
}

impl DurationCategory {
    pub const ALL: [DurationCategory; 5] = [
        DurationCategory::VeryShort,
        DurationCategory::Short,
        DurationCategory::Medium,
        DurationCategory::Long,
        DurationCategory::Giant,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            DurationCategory::VeryShort => "very_short",
            DurationCategory::Short => "short",
            DurationCategory::Medium => "medium",
            DurationCategory::Long => "long",
            DurationCategory::Giant => "giant",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id.trim().to_lowercase().replace('-', "_"))
    }

    /// Bucket a runtime in minutes: <=5, <=20, <=40, <=120, >120
    pub fn for_minutes(minutes: u32) -> Self {
        match minutes {
            0..=5 => DurationCategory::VeryShort,
            6..=20 => DurationCategory::Short,
            21..=40 => DurationCategory::Medium,
            41..=120 => DurationCategory::Long,
            _ => DurationCategory::Giant,
        }
    }
}

/// A named band of the 0-10 rating scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingCategory {
    pub id: &'static str,
    pub label_en: &'static str,
    pub label_pt: &'static str,
    pub min: f64,
    pub max: f64,
}

impl RatingCategory {
    /// Bands are half-open up to the next band's `min`; the top band keeps its inclusive `max`
    pub fn contains(&self, rating: f64) -> bool {
        if rating < self.min {
            return false;
        }
        let next_min = crate::constants::RATING_CATEGORIES
            .iter()
            .map(|c| c.min)
            .filter(|min| *min > self.min)
            .reduce(f64::min);
        match next_min {
            Some(next) => rating < next,
            None => rating <= self.max,
        }
    }

    pub fn by_id(id: &str) -> Option<&'static RatingCategory> {
        crate::constants::RATING_CATEGORIES.iter().find(|c| c.id == id)
    }
}
