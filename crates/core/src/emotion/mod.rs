use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{EyesError, Result};

/// The fixed set of expressions the eyes can show.
///
/// The discriminant doubles as the numeric identifier used by hosts that
/// address emotions by index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    #[default]
    Normal = 0,
    Happy = 1,
    Sad = 2,
    Angry = 3,
    Surprised = 4,
    Fearful = 5,
    Disgusted = 6,
    Glee = 7,
    Content = 8,
    Relaxed = 9,
    Focused = 10,
    Confused = 11,
    Frustrated = 12,
    Determined = 13,
    Concerned = 14,
    Expectant = 15,
    Joyful = 16,
    Loving = 17,
}

impl Emotion {
    pub const COUNT: usize = 18;

    pub const ALL: [Emotion; Emotion::COUNT] = [
        Emotion::Normal,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Surprised,
        Emotion::Fearful,
        Emotion::Disgusted,
        Emotion::Glee,
        Emotion::Content,
        Emotion::Relaxed,
        Emotion::Focused,
        Emotion::Confused,
        Emotion::Frustrated,
        Emotion::Determined,
        Emotion::Concerned,
        Emotion::Expectant,
        Emotion::Joyful,
        Emotion::Loving,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Normal => "normal",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Surprised => "surprised",
            Emotion::Fearful => "fearful",
            Emotion::Disgusted => "disgusted",
            Emotion::Glee => "glee",
            Emotion::Content => "content",
            Emotion::Relaxed => "relaxed",
            Emotion::Focused => "focused",
            Emotion::Confused => "confused",
            Emotion::Frustrated => "frustrated",
            Emotion::Determined => "determined",
            Emotion::Concerned => "concerned",
            Emotion::Expectant => "expectant",
            Emotion::Joyful => "joyful",
            Emotion::Loving => "loving",
        }
    }

    /// Case-insensitive lookup by name. Surrounding whitespace is ignored.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|emotion| emotion.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = EyesError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| EyesError::config(format!("unknown emotion `{s}`")))
    }
}

/// Selection weights for random emotion changes.
///
/// Every emotion starts at weight 0, which makes it unreachable by
/// [`EmotionWeights::sample`].
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionWeights {
    weights: [f32; Emotion::COUNT],
}

impl Default for EmotionWeights {
    fn default() -> Self {
        Self::new()
    }
}

impl EmotionWeights {
    pub fn new() -> Self {
        Self {
            weights: [0.0; Emotion::COUNT],
        }
    }

    /// Sets the weight of one emotion. Negative and non-finite weights are
    /// rejected so that sampling never has to deal with them.
    pub fn set(&mut self, emotion: Emotion, weight: f32) -> Result<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(EyesError::config(format!(
                "emotion `{emotion}` has invalid weight {weight}; weights must be finite and >= 0"
            )));
        }
        self.weights[emotion.index()] = weight;
        Ok(())
    }

    pub fn get(&self, emotion: Emotion) -> f32 {
        self.weights[emotion.index()]
    }

    pub fn total(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// Emotions that can be selected, in identifier order.
    pub fn reachable(&self) -> impl Iterator<Item = (Emotion, f32)> + '_ {
        Emotion::ALL
            .iter()
            .copied()
            .map(|emotion| (emotion, self.get(emotion)))
            .filter(|(_, weight)| *weight > 0.0)
    }

    /// Maps a uniform draw `unit` in `[0, 1)` onto an emotion with
    /// probability proportional to its weight. Returns `None` when every
    /// weight is zero.
    pub fn sample(&self, unit: f32) -> Option<Emotion> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }

        let mut target = unit.clamp(0.0, 1.0) * total;
        let mut last = None;
        for (emotion, weight) in self.reachable() {
            if target < weight {
                return Some(emotion);
            }
            target -= weight;
            last = Some(emotion);
        }
        // Rounding can leave `target` marginally above the final bucket.
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_case_insensitively() {
        for emotion in Emotion::ALL {
            let upper = emotion.as_str().to_uppercase();
            assert_eq!(Emotion::from_name(&upper), Some(emotion));
            assert_eq!(Emotion::from_index(emotion.index()), Some(emotion));
        }
        assert_eq!(Emotion::from_name("  Happy "), Some(Emotion::Happy));
        assert_eq!(Emotion::from_name("sleepy"), None);
        assert!("sleepy".parse::<Emotion>().is_err());
    }

    #[test]
    fn identifiers_follow_host_numbering() {
        assert_eq!(Emotion::Normal.index(), 0);
        assert_eq!(Emotion::Glee.index(), 7);
        assert_eq!(Emotion::Loving.index(), 17);
        assert_eq!(Emotion::from_index(18), None);
    }

    #[test]
    fn rejects_negative_and_nan_weights() {
        let mut weights = EmotionWeights::new();
        assert!(weights.set(Emotion::Sad, -0.1).unwrap_err().is_config());
        assert!(weights.set(Emotion::Sad, f32::NAN).is_err());
        assert!(weights.set(Emotion::Sad, f32::INFINITY).is_err());
        assert_eq!(weights.get(Emotion::Sad), 0.0);
    }

    #[test]
    fn all_zero_weights_sample_nothing() {
        let weights = EmotionWeights::new();
        assert_eq!(weights.sample(0.0), None);
        assert_eq!(weights.sample(0.99), None);
    }

    #[test]
    fn sample_walks_buckets_in_order() {
        let mut weights = EmotionWeights::new();
        weights.set(Emotion::Normal, 1.0).unwrap();
        weights.set(Emotion::Angry, 3.0).unwrap();

        assert_eq!(weights.sample(0.0), Some(Emotion::Normal));
        assert_eq!(weights.sample(0.24), Some(Emotion::Normal));
        assert_eq!(weights.sample(0.26), Some(Emotion::Angry));
        assert_eq!(weights.sample(1.0), Some(Emotion::Angry));
    }

    #[test]
    fn zero_weight_is_skipped() {
        let mut weights = EmotionWeights::new();
        weights.set(Emotion::Normal, 1.0).unwrap();
        weights.set(Emotion::Happy, 0.0).unwrap();

        for step in 0..1000 {
            let unit = step as f32 / 1000.0;
            assert_eq!(weights.sample(unit), Some(Emotion::Normal));
        }
    }
}
