use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::geometry::{Position, Rect};

// ── ItemKind ─────────────────────────────────────────────────────────────────

/// Every kind of thing the player can pick up or combine, plus the two world
/// fixtures (`River`, `Fire`) that take part in recipes without being consumed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemKind {
    Lemon,
    EmptyBucket,
    WaterBucket,
    Sugar,
    LemonyWater,
    SugaryWater,
    SugaryLemonWater,
    Lemonade,
    Soap,
    SoapyWater,
    RedSock,
    DirtyRobes,
    WhiteLaundry,
    ColorRunLaundry,
    WhiteRobes,
    PinkRobes,
    BeesWax,
    CandleWick,
    BlackDye,
    EssenceOfCinnamon,
    BlackCandles,
    Shovel,
    Flower,
    River,
    Fire,
}

impl ItemKind {
    /// The complete registry, in declaration order.
    pub const ALL: [ItemKind; 25] = [
        Self::Lemon,
        Self::EmptyBucket,
        Self::WaterBucket,
        Self::Sugar,
        Self::LemonyWater,
        Self::SugaryWater,
        Self::SugaryLemonWater,
        Self::Lemonade,
        Self::Soap,
        Self::SoapyWater,
        Self::RedSock,
        Self::DirtyRobes,
        Self::WhiteLaundry,
        Self::ColorRunLaundry,
        Self::WhiteRobes,
        Self::PinkRobes,
        Self::BeesWax,
        Self::CandleWick,
        Self::BlackDye,
        Self::EssenceOfCinnamon,
        Self::BlackCandles,
        Self::Shovel,
        Self::Flower,
        Self::River,
        Self::Fire,
    ];

    /// Name shown to the player ("pickup the water bucket").
    pub fn name(self) -> &'static str {
        match self {
            Self::Lemon => "lemon",
            Self::EmptyBucket => "bucket",
            Self::WaterBucket => "water bucket",
            Self::Sugar => "sugar",
            Self::LemonyWater => "lemon water",
            Self::SugaryWater => "sugary water",
            Self::SugaryLemonWater => "sugary lemon water",
            Self::Lemonade => "lemonade",
            Self::Soap => "soap",
            Self::SoapyWater => "soapy water",
            Self::RedSock => "red sock",
            Self::DirtyRobes => "dirty robes",
            Self::WhiteLaundry => "whites laundry",
            Self::ColorRunLaundry => "color ruined laundry",
            Self::WhiteRobes => "white robes",
            Self::PinkRobes => "pink robes",
            Self::BeesWax => "bees wax",
            Self::CandleWick => "candle wick",
            Self::BlackDye => "black dye",
            Self::EssenceOfCinnamon => "essence of cinnamon",
            Self::BlackCandles => "black candle",
            Self::Shovel => "shovel",
            Self::Flower => "flower",
            Self::River => "river",
            Self::Fire => "fire",
        }
    }

    /// Stable snake_case identifier, used on the command line and in data files.
    pub fn ident(self) -> &'static str {
        match self {
            Self::Lemon => "lemon",
            Self::EmptyBucket => "empty_bucket",
            Self::WaterBucket => "water_bucket",
            Self::Sugar => "sugar",
            Self::LemonyWater => "lemony_water",
            Self::SugaryWater => "sugary_water",
            Self::SugaryLemonWater => "sugary_lemon_water",
            Self::Lemonade => "lemonade",
            Self::Soap => "soap",
            Self::SoapyWater => "soapy_water",
            Self::RedSock => "red_sock",
            Self::DirtyRobes => "dirty_robes",
            Self::WhiteLaundry => "white_laundry",
            Self::ColorRunLaundry => "color_run_laundry",
            Self::WhiteRobes => "white_robes",
            Self::PinkRobes => "pink_robes",
            Self::BeesWax => "bees_wax",
            Self::CandleWick => "candle_wick",
            Self::BlackDye => "black_dye",
            Self::EssenceOfCinnamon => "essence_of_cinnamon",
            Self::BlackCandles => "black_candles",
            Self::Shovel => "shovel",
            Self::Flower => "flower",
            Self::River => "river",
            Self::Fire => "fire",
        }
    }

    /// How the item is drawn. Kinds without art get a flat coloured square.
    pub fn visual(self) -> Visual {
        use Visual::{Sprite, Swatch};
        match self {
            Self::Lemon => Sprite("lemon"),
            Self::EmptyBucket => Sprite("basin_empty"),
            Self::WaterBucket => Sprite("basin_water"),
            Self::Sugar => Swatch { color: [10, 10, 10], size: 30 },
            Self::LemonyWater => Swatch { color: [250, 250, 210], size: 30 },
            Self::SugaryWater => Swatch { color: [50, 50, 100], size: 30 },
            Self::SugaryLemonWater => Swatch { color: [123, 123, 105], size: 30 },
            Self::Lemonade => Swatch { color: [50, 100, 100], size: 30 },
            Self::Soap => Sprite("soap"),
            Self::SoapyWater => Swatch { color: [136, 209, 243], size: 25 },
            Self::RedSock => Swatch { color: [255, 60, 60], size: 25 },
            Self::DirtyRobes => Sprite("laundry_dirty"),
            Self::WhiteLaundry => Swatch { color: [152, 183, 203], size: 25 },
            Self::ColorRunLaundry => Swatch { color: [234, 164, 217], size: 25 },
            Self::WhiteRobes => Sprite("laundry_clean_white"),
            Self::PinkRobes => Sprite("laundry_clean_pink"),
            Self::BeesWax => Swatch { color: [217, 239, 30], size: 25 },
            Self::CandleWick => Swatch { color: [30, 30, 30], size: 25 },
            Self::BlackDye => Swatch { color: [0, 0, 0], size: 25 },
            Self::EssenceOfCinnamon => Swatch { color: [122, 71, 47], size: 25 },
            Self::BlackCandles => Swatch { color: [20, 20, 20], size: 25 },
            Self::Shovel => Sprite("shovel"),
            Self::Flower => Sprite("plant1"),
            Self::River => Sprite("river"),
            Self::Fire => Sprite("fire"),
        }
    }

    /// Fixtures are part of the map: they react, but are never consumed or
    /// carried.
    pub fn is_fixture(self) -> bool {
        matches!(self, Self::River | Self::Fire)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ItemKind {
    type Err = Error;

    /// Accepts either the display name (`"water bucket"`) or the identifier
    /// (`"water_bucket"`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.ident() == wanted || k.name() == wanted)
            .ok_or_else(|| Error::UnknownItemKind(s.to_string()))
    }
}

// ── Visual ───────────────────────────────────────────────────────────────────

/// Reference to an item's visual representation. The pixels themselves live in
/// the [`AssetCache`](crate::assets::AssetCache).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Visual {
    /// A named sprite, resolved through the sprite manifest.
    Sprite(&'static str),
    /// A solid square of `size` × `size` pixels.
    Swatch { color: [u8; 3], size: u32 },
}

impl Visual {
    /// Footprint of a swatch, if this visual has a fixed one.
    pub fn swatch_rect(&self) -> Option<Rect> {
        match *self {
            Visual::Swatch { size, .. } => Some(Rect::new(0, 0, size, size)),
            Visual::Sprite(_) => None,
        }
    }
}

// ── Item ─────────────────────────────────────────────────────────────────────

/// One concrete item placed somewhere in the world.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub kind: ItemKind,
    pub position: Position,
}

impl Item {
    pub fn new(kind: ItemKind, position: Position) -> Self {
        Self { kind, position }
    }

    pub fn at(kind: ItemKind, x: i32, y: i32) -> Self {
        Self::new(kind, Position::new(x, y))
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Verb shown in the info box when the player is next to this item.
    pub fn action(&self) -> &'static str {
        if self.kind.is_fixture() { "use" } else { "pickup" }
    }

    /// e.g. "pickup the lemon".
    pub fn help_text(&self) -> String {
        format!("{} the {}", self.action(), self.name())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn registry_names_and_idents_are_unique() {
        let names: HashSet<_> = ItemKind::ALL.iter().map(|k| k.name()).collect();
        let idents: HashSet<_> = ItemKind::ALL.iter().map(|k| k.ident()).collect();
        assert_eq!(names.len(), ItemKind::ALL.len());
        assert_eq!(idents.len(), ItemKind::ALL.len());
    }

    #[test]
    fn parse_accepts_name_and_ident() {
        assert_eq!("water bucket".parse::<ItemKind>().unwrap(), ItemKind::WaterBucket);
        assert_eq!("water_bucket".parse::<ItemKind>().unwrap(), ItemKind::WaterBucket);
        assert_eq!(" Lemon ".parse::<ItemKind>().unwrap(), ItemKind::Lemon);
    }

    #[test]
    fn parse_round_trips_every_kind() {
        for kind in ItemKind::ALL {
            assert_eq!(kind.ident().parse::<ItemKind>().unwrap(), kind);
            assert_eq!(kind.name().parse::<ItemKind>().unwrap(), kind);
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "lemonade stand".parse::<ItemKind>().unwrap_err();
        assert!(matches!(err, Error::UnknownItemKind(ref s) if s == "lemonade stand"));
    }

    #[test]
    fn only_river_and_fire_are_fixtures() {
        let fixtures: Vec<_> = ItemKind::ALL.into_iter().filter(|k| k.is_fixture()).collect();
        assert_eq!(fixtures, vec![ItemKind::River, ItemKind::Fire]);
    }

    #[test]
    fn help_text_uses_action_and_name() {
        assert_eq!(Item::at(ItemKind::Lemon, 0, 0).help_text(), "pickup the lemon");
        assert_eq!(Item::at(ItemKind::Fire, 0, 0).help_text(), "use the fire");
    }

    #[test]
    fn swatch_rect_only_for_swatches() {
        assert_eq!(ItemKind::Sugar.visual().swatch_rect(), Some(Rect::new(0, 0, 30, 30)));
        assert_eq!(ItemKind::Lemon.visual().swatch_rect(), None);
    }
}
