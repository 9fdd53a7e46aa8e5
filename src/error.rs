use thiserror::Error;

use crate::items::ItemKind;

/// Errors raised by the crafting core, the item world and the asset cache.
///
/// A pair of items that simply does not react is *not* an error; the resolver
/// reports that as an empty [`Combination`](crate::combine::Combination).
#[derive(Debug, Error)]
pub enum Error {
    /// A name was passed that is not in the item registry.
    #[error("unknown item kind: {0:?}")]
    UnknownItemKind(String),

    /// Two rules cover the same unordered pair but disagree on the outcome.
    #[error("conflicting rules for {a} + {b}")]
    ConflictingRule { a: ItemKind, b: ItemKind },

    /// An `ItemId` that is stale or was never issued.
    #[error("no such item in the world")]
    NoSuchItem,

    /// Fixtures (rivers, fires) stay where they are.
    #[error("{0} cannot be picked up")]
    NotPickable(ItemKind),

    #[error("hands are full")]
    HandsFull,

    /// A hand slot index that holds nothing.
    #[error("hand slot {0} is empty")]
    EmptySlot(usize),

    #[error("invalid sprite sheet layout: {0}")]
    InvalidSheetLayout(String),

    /// An image or sprite name the cache has never loaded.
    #[error("asset not loaded: {0}")]
    MissingAsset(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
