use anyhow::{bail, Result};
use rand::{rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

/// The bins a player can sort an item into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryId {
    General,
    Recycle,
    Wet,
    Hazardous,
}

/// One sorting bin as shown to the player. The catalog is fixed for the
/// lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub display_name: String,
    pub color: String,
}

pub fn default_categories() -> Vec<Category> {
    let bin = |id, display_name: &str, color: &str| Category {
        id,
        display_name: display_name.to_string(),
        color: color.to_string(),
    };

    vec![
        bin(CategoryId::General, "General", "#4B5563"),
        bin(CategoryId::Recycle, "Recyclable", "#3B82F6"),
        bin(CategoryId::Wet, "Wet", "#10B981"),
        bin(CategoryId::Hazardous, "Hazardous", "#EF4444"),
    ]
}

/// A sortable item. Artwork is fetched asynchronously after the item is
/// picked, so only the URL lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    pub category: CategoryId,
    pub artwork_url: String,
}

impl Item {
    pub fn new(name: &str, category: CategoryId, artwork_url: &str) -> Self {
        Self {
            name: name.to_string(),
            category,
            artwork_url: artwork_url.to_string(),
        }
    }
}

/// The pool rounds draw from, uniformly at random. Repeats are allowed.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn new(items: Vec<Item>) -> Result<Self> {
        if items.is_empty() {
            bail!("item catalog must not be empty");
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn pick(&self, rng: &mut StdRng) -> Item {
        self.items
            .choose(rng)
            .cloned()
            .expect("catalog is never empty")
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            items: vec![
                Item::new(
                    "Plastic Bottle",
                    CategoryId::Recycle,
                    "https://img.lovepik.com/png/20230930/mineral-water-water-bottle-recover-drink_36069_wh860.png",
                ),
                Item::new(
                    "Banana Peel",
                    CategoryId::Wet,
                    "https://png.pngtree.com/png-clipart/20220108/ourmid/pngtree-banana-peel-decorative-pattern-illustration-png-image_4101651.png",
                ),
                Item::new(
                    "Battery",
                    CategoryId::Hazardous,
                    "https://e7.pngegg.com/pngimages/636/772/png-clipart-battery-battery-thumbnail.png",
                ),
                Item::new(
                    "Paper",
                    CategoryId::Recycle,
                    "https://png.pngtree.com/png-clipart/20220720/original/pngtree-toilet-tissue-paper-roll-vector-illustration-png-image_8388391.png",
                ),
                Item::new(
                    "Fishbone",
                    CategoryId::Wet,
                    "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcR8Pc6CqNsOt25cGt3g3k8iIvHyIeX1RnpjFQ&s",
                ),
                Item::new(
                    "Candy Wrapper",
                    CategoryId::General,
                    "https://t4.ftcdn.net/jpg/03/04/69/69/360_F_304696907_czmMiRwezOOmR4F3M4soUUfRSmiC7O2a.jpg",
                ),
            ],
        }
    }
}
