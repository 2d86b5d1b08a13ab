//! The fixed emotion taxonomy and the keyword/genre lookup tables used by the tagger.
//!
//! Tables hold lower-cased keys in English and Korean. Every key maps to
//! exactly one [`Emotion`], so a computed emotion can only ever be a
//! taxonomy member.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Happiness,
    Sadness,
    Fear,
    Anger,
    Love,
    Surprise,
    Calm,
    Tension,
    Touched,
    Hope,
}

impl Emotion {
    pub const ALL: [Emotion; 10] = [
        Emotion::Happiness,
        Emotion::Sadness,
        Emotion::Fear,
        Emotion::Anger,
        Emotion::Love,
        Emotion::Surprise,
        Emotion::Calm,
        Emotion::Tension,
        Emotion::Touched,
        Emotion::Hope,
    ];

    /// Name as registered in the emotions table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happiness => "happiness",
            Emotion::Sadness => "sadness",
            Emotion::Fear => "fear",
            Emotion::Anger => "anger",
            Emotion::Love => "love",
            Emotion::Surprise => "surprise",
            Emotion::Calm => "calm",
            Emotion::Tension => "tension",
            Emotion::Touched => "touched",
            Emotion::Hope => "hope",
        }
    }

    pub fn korean_label(&self) -> &'static str {
        match self {
            Emotion::Happiness => "행복",
            Emotion::Sadness => "슬픔",
            Emotion::Fear => "공포",
            Emotion::Anger => "분노",
            Emotion::Love => "사랑",
            Emotion::Surprise => "놀라움",
            Emotion::Calm => "평온",
            Emotion::Tension => "긴장",
            Emotion::Touched => "감동",
            Emotion::Hope => "희망",
        }
    }

    /// Default description used when seeding the taxonomy.
    pub fn description(&self) -> &'static str {
        match self {
            Emotion::Happiness => "Joy, laughter and light-hearted fun",
            Emotion::Sadness => "Grief, loss and melancholy",
            Emotion::Fear => "Dread, horror and the supernatural",
            Emotion::Anger => "Rage, revenge and injustice",
            Emotion::Love => "Romance, affection and relationships",
            Emotion::Surprise => "Twists, shocks and revelations",
            Emotion::Calm => "Peace, serenity and quiet",
            Emotion::Tension => "Suspense, anxiety and thrills",
            Emotion::Touched => "Heartwarming, moving and poignant",
            Emotion::Hope => "Courage, dreams and uplift",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Emotion::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == needle || e.korean_label() == needle)
            .ok_or_else(|| format!("unknown emotion: {s}"))
    }
}

pub const KEYWORD_EMOTIONS: &[(&str, Emotion)] = &[
    // happiness
    ("comedy", Emotion::Happiness),
    ("funny", Emotion::Happiness),
    ("humor", Emotion::Happiness),
    ("laughter", Emotion::Happiness),
    ("코미디", Emotion::Happiness),
    ("코믹", Emotion::Happiness),
    ("유머", Emotion::Happiness),
    ("웃음", Emotion::Happiness),
    ("재밌", Emotion::Happiness),
    ("fun", Emotion::Happiness),
    ("joyful", Emotion::Happiness),
    ("happy", Emotion::Happiness),
    ("happiness", Emotion::Happiness),
    // sadness
    ("sad", Emotion::Sadness),
    ("tragedy", Emotion::Sadness),
    ("grief", Emotion::Sadness),
    ("tear", Emotion::Sadness),
    ("슬픔", Emotion::Sadness),
    ("슬픈", Emotion::Sadness),
    ("눈물", Emotion::Sadness),
    ("비극", Emotion::Sadness),
    ("상실", Emotion::Sadness),
    ("melancholy", Emotion::Sadness),
    ("sorrow", Emotion::Sadness),
    ("depressing", Emotion::Sadness),
    // fear
    ("horror", Emotion::Fear),
    ("scary", Emotion::Fear),
    ("terror", Emotion::Fear),
    ("ghost", Emotion::Fear),
    ("공포", Emotion::Fear),
    ("무서운", Emotion::Fear),
    ("괴물", Emotion::Fear),
    ("귀신", Emotion::Fear),
    ("좀비", Emotion::Fear),
    ("creature", Emotion::Fear),
    ("monster", Emotion::Fear),
    ("zombie", Emotion::Fear),
    ("nightmare", Emotion::Fear),
    ("supernatural horror", Emotion::Fear),
    // anger
    ("anger", Emotion::Anger),
    ("rage", Emotion::Anger),
    ("revenge", Emotion::Anger),
    ("vengeance", Emotion::Anger),
    ("분노", Emotion::Anger),
    ("복수", Emotion::Anger),
    ("화", Emotion::Anger),
    ("격분", Emotion::Anger),
    ("증오", Emotion::Anger),
    ("fury", Emotion::Anger),
    ("wrath", Emotion::Anger),
    ("hate", Emotion::Anger),
    // love
    ("love", Emotion::Love),
    ("romance", Emotion::Love),
    ("romantic", Emotion::Love),
    ("relationship", Emotion::Love),
    ("사랑", Emotion::Love),
    ("로맨스", Emotion::Love),
    ("연애", Emotion::Love),
    ("로맨틱", Emotion::Love),
    ("커플", Emotion::Love),
    ("passion", Emotion::Love),
    ("affection", Emotion::Love),
    ("kiss", Emotion::Love),
    // surprise
    ("surprise", Emotion::Surprise),
    ("twist", Emotion::Surprise),
    ("unexpected", Emotion::Surprise),
    ("shocking", Emotion::Surprise),
    ("놀라움", Emotion::Surprise),
    ("반전", Emotion::Surprise),
    ("충격", Emotion::Surprise),
    ("예상치 못한", Emotion::Surprise),
    ("revelation", Emotion::Surprise),
    ("plot twist", Emotion::Surprise),
    ("amazing", Emotion::Surprise),
    // calm
    ("calm", Emotion::Calm),
    ("peaceful", Emotion::Calm),
    ("serene", Emotion::Calm),
    ("tranquil", Emotion::Calm),
    ("평온", Emotion::Calm),
    ("차분", Emotion::Calm),
    ("평화", Emotion::Calm),
    ("안정", Emotion::Calm),
    ("고요", Emotion::Calm),
    ("harmony", Emotion::Calm),
    ("relaxing", Emotion::Calm),
    // tension
    ("tense", Emotion::Tension),
    ("suspense", Emotion::Tension),
    ("thriller", Emotion::Tension),
    ("anxiety", Emotion::Tension),
    ("긴장", Emotion::Tension),
    ("스릴러", Emotion::Tension),
    ("서스펜스", Emotion::Tension),
    ("불안", Emotion::Tension),
    ("intense", Emotion::Tension),
    ("tension", Emotion::Tension),
    ("nerve-wracking", Emotion::Tension),
    // touched
    ("moving", Emotion::Touched),
    ("touching", Emotion::Touched),
    ("emotional", Emotion::Touched),
    ("heartwarming", Emotion::Touched),
    ("감동", Emotion::Touched),
    ("울컥", Emotion::Touched),
    ("감성", Emotion::Touched),
    ("마음이 따뜻해지는", Emotion::Touched),
    ("heartfelt", Emotion::Touched),
    ("inspirational", Emotion::Touched),
    ("poignant", Emotion::Touched),
    // hope
    ("hope", Emotion::Hope),
    ("inspiring", Emotion::Hope),
    ("uplifting", Emotion::Hope),
    ("dream", Emotion::Hope),
    ("희망", Emotion::Hope),
    ("꿈", Emotion::Hope),
    ("도전", Emotion::Hope),
    ("극복", Emotion::Hope),
    ("용기", Emotion::Hope),
    ("optimistic", Emotion::Hope),
    ("courage", Emotion::Hope),
    ("faith", Emotion::Hope),
];

pub const GENRE_EMOTIONS: &[(&str, Emotion)] = &[
    ("코미디", Emotion::Happiness),
    ("로맨스", Emotion::Love),
    ("로맨틱 코미디", Emotion::Love),
    ("드라마", Emotion::Touched),
    ("공포", Emotion::Fear),
    ("호러", Emotion::Fear),
    ("스릴러", Emotion::Tension),
    ("액션", Emotion::Tension),
    ("모험", Emotion::Hope),
    ("판타지", Emotion::Calm),
    ("가족", Emotion::Happiness),
    ("애니메이션", Emotion::Happiness),
    ("멜로", Emotion::Sadness),
    ("범죄", Emotion::Anger),
    ("다큐멘터리", Emotion::Calm),
    ("음악", Emotion::Calm),
    ("미스터리", Emotion::Surprise),
    ("전쟁", Emotion::Sadness),
    ("역사", Emotion::Touched),
    ("스포츠", Emotion::Hope),
    ("서부", Emotion::Calm),
    ("뮤지컬", Emotion::Happiness),
    ("comedy", Emotion::Happiness),
    ("romance", Emotion::Love),
    ("romantic comedy", Emotion::Love),
    ("drama", Emotion::Touched),
    ("horror", Emotion::Fear),
    ("thriller", Emotion::Tension),
    ("action", Emotion::Tension),
    ("adventure", Emotion::Hope),
    ("fantasy", Emotion::Calm),
    ("family", Emotion::Happiness),
    ("animation", Emotion::Happiness),
    ("crime", Emotion::Anger),
    ("documentary", Emotion::Calm),
    ("music", Emotion::Calm),
    ("mystery", Emotion::Surprise),
    ("war", Emotion::Sadness),
    ("history", Emotion::Touched),
    ("sport", Emotion::Hope),
    ("western", Emotion::Calm),
    ("musical", Emotion::Happiness),
    ("sci-fi", Emotion::Surprise),
    ("science fiction", Emotion::Surprise),
];

/// Applied when fewer than two emotions were found. First rule whose needle
/// occurs in the lower-cased genres wins; otherwise [`DEFAULT_FALLBACK`].
#[derive(Debug, Clone, Copy)]
pub struct FallbackRule {
    pub needles: &'static [&'static str],
    pub boosts: [(Emotion, f64); 2],
}

pub const FALLBACK_RULES: &[FallbackRule] = &[
    FallbackRule {
        needles: &["공포", "horror"],
        boosts: [(Emotion::Fear, 0.5), (Emotion::Tension, 0.3)],
    },
    FallbackRule {
        needles: &["코미디", "comedy"],
        boosts: [(Emotion::Happiness, 0.5), (Emotion::Surprise, 0.2)],
    },
    FallbackRule {
        needles: &["로맨스", "romance"],
        boosts: [(Emotion::Love, 0.5), (Emotion::Touched, 0.2)],
    },
];

pub const DEFAULT_FALLBACK: [(Emotion, f64); 2] = [(Emotion::Calm, 0.3), (Emotion::Hope, 0.2)];

static KEYWORD_INDEX: Lazy<HashMap<&'static str, Emotion>> =
    Lazy::new(|| KEYWORD_EMOTIONS.iter().copied().collect());

static GENRE_INDEX: Lazy<HashMap<&'static str, Emotion>> =
    Lazy::new(|| GENRE_EMOTIONS.iter().copied().collect());

/// Exact lookup of a lower-cased token in the keyword table.
pub fn keyword_emotion(token: &str) -> Option<Emotion> {
    KEYWORD_INDEX.get(token).copied()
}

/// Exact lookup of a lower-cased token in the genre table.
pub fn genre_emotion(token: &str) -> Option<Emotion> {
    GENRE_INDEX.get(token).copied()
}

/// Boosts for the low-signal fallback given lower-cased genres.
pub fn fallback_boosts(genres_lower: &str) -> [(Emotion, f64); 2] {
    FALLBACK_RULES
        .iter()
        .find(|rule| rule.needles.iter().any(|n| genres_lower.contains(n)))
        .map(|rule| rule.boosts)
        .unwrap_or(DEFAULT_FALLBACK)
}
