//! Moderation API payload types

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Review status of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Pending,
    Approved,
    Rejected,
    Reported,
}

impl Status {
    /// Numeric code the status endpoint expects
    pub fn code(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Approved => 1,
            Self::Rejected => 2,
            Self::Reported => 3,
        }
    }

    /// Statuses a reviewer may move a submission to
    pub fn review_targets(self) -> &'static [Status] {
        match self {
            Self::Pending => &[Self::Approved, Self::Rejected],
            _ => &[Self::Pending, Self::Approved, Self::Rejected],
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Reported => "Reported",
        };
        f.write_str(name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CodeOrName {
    Code(u8),
    Name(String),
}

macro_rules! coded_enum {
    ($name:ident { $($variant:ident = $code:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
        pub enum $name {
            $($variant),+
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match CodeOrName::deserialize(deserializer)? {
                    $(CodeOrName::Code($code) => Ok(Self::$variant),)+
                    CodeOrName::Code(other) => Err(serde::de::Error::custom(format!(
                        concat!("unknown ", stringify!($name), " code {}"),
                        other
                    ))),
                    CodeOrName::Name(name) => match name.as_str() {
                        $(stringify!($variant) => Ok(Self::$variant),)+
                        _ => Err(serde::de::Error::unknown_variant(&name, &[$(stringify!($variant)),+])),
                    },
                }
            }
        }
    };
}

coded_enum!(Difficulty {
    Easy = 0,
    Medium = 1,
    Hard = 2,
});

coded_enum!(PortionType {
    Servings = 0,
    Pieces = 1,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub step: u32,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

/// Recipe submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub creator_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub video: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub status: Status,
    pub portion_quantity: f64,
    pub portion_type: PortionType,
    #[serde(default)]
    pub prep_time: String,
    #[serde(default)]
    pub cook_time: String,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    pub ingredients: Vec<Ingredient>,
}

/// Culinary tip submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CulinaryTip {
    pub id: String,
    pub creator_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub video: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub status: Status,
}

/// Kind of post, as named in status update paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionType {
    Recipe,
    CulinaryTip,
}

impl SubmissionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recipe => "Recipe",
            Self::CulinaryTip => "CulinaryTip",
        }
    }

    /// Path segment used by the post details endpoint
    pub fn detail_segment(self) -> &'static str {
        match self {
            Self::Recipe => "recipe",
            Self::CulinaryTip => "tip",
        }
    }
}

/// Either kind of post; recipes are the ones carrying ingredients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Submission {
    Recipe(Recipe),
    CulinaryTip(CulinaryTip),
}

impl<'de> Deserialize<'de> for Submission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let is_recipe = value.get("ingredients").is_some();
        if is_recipe {
            Recipe::deserialize(value)
                .map(Self::Recipe)
                .map_err(serde::de::Error::custom)
        } else {
            CulinaryTip::deserialize(value)
                .map(Self::CulinaryTip)
                .map_err(serde::de::Error::custom)
        }
    }
}

impl Submission {
    pub fn id(&self) -> &str {
        match self {
            Self::Recipe(recipe) => &recipe.id,
            Self::CulinaryTip(tip) => &tip.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Recipe(recipe) => &recipe.title,
            Self::CulinaryTip(tip) => &tip.title,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Self::Recipe(recipe) => recipe.status,
            Self::CulinaryTip(tip) => tip.status,
        }
    }

    pub fn video(&self) -> Option<&str> {
        match self {
            Self::Recipe(recipe) => recipe.video.as_deref(),
            Self::CulinaryTip(tip) => tip.video.as_deref(),
        }
        .filter(|video| !video.is_empty())
    }

    pub fn kind(&self) -> SubmissionType {
        match self {
            Self::Recipe(_) => SubmissionType::Recipe,
            Self::CulinaryTip(_) => SubmissionType::CulinaryTip,
        }
    }
}

/// Submissions listing, recipes and tips side by side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submissions {
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub culinary_tips: Vec<CulinaryTip>,
}

/// A user report against a post or one of its comments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedContent {
    pub id: String,
    pub post_id: String,
    #[serde(default)]
    pub comment_id: Option<String>,
    pub user_id: String,
    pub username: String,
    pub reason: String,
    pub post_type: SubmissionType,
}

impl ReportedContent {
    pub fn targets_comment(&self) -> bool {
        self.comment_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// A comment attached to a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostComment {
    pub id: String,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}
