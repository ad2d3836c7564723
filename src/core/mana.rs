//! Mana costs and mana pools
//!
//! Costs use the bracketed notation `{3}{G}{G}`: each group is either a
//! decimal colorless amount or one color letter (`W`, `U`, `B`, `R`, `G`,
//! any case). Groups may come in any order and at least one is required.

use crate::{Result, TabletopError};
use nom::{
    branch::alt,
    character::complete::{anychar, char, digit1},
    combinator::{all_consuming, map_opt, map_res},
    multi::many1,
    sequence::delimited,
    Finish, IResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five mana colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    /// WUBRG order
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn symbol(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    pub fn from_symbol(c: char) -> Option<Color> {
        match c.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One bracketed group of the notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ManaSymbol {
    Colorless(u32),
    Colored(Color),
}

fn mana_symbol(input: &str) -> IResult<&str, ManaSymbol> {
    delimited(
        char('{'),
        alt((
            map_res(digit1, |digits: &str| {
                digits.parse::<u32>().map(ManaSymbol::Colorless)
            }),
            map_opt(anychar, |c| Color::from_symbol(c).map(ManaSymbol::Colored)),
        )),
        char('}'),
    )(input)
}

/// An immutable mana cost
///
/// There are no mutating methods; build a new cost by parsing or with
/// [`ManaCost::from_amounts`]. [`ManaCost::EMPTY`] is the all-zero cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ManaCost {
    colorless: u32,
    colored: [u32; 5],
}

impl ManaCost {
    pub const EMPTY: ManaCost = ManaCost {
        colorless: 0,
        colored: [0; 5],
    };

    /// Parse bracketed notation like `{3}{G}{G}`
    pub fn parse(notation: &str) -> Result<Self> {
        let (_, symbols) = all_consuming(many1(mana_symbol))(notation)
            .finish()
            .map_err(|e| TabletopError::ManaParse {
                input: notation.to_string(),
                reason: if e.input.is_empty() {
                    "expected at least one {…} group".to_string()
                } else {
                    format!("unrecognized input at {:?}", e.input)
                },
            })?;

        let mut colorless: u32 = 0;
        let mut colored = [0u32; 5];
        for symbol in symbols {
            match symbol {
                ManaSymbol::Colorless(amount) => {
                    colorless = colorless.checked_add(amount).ok_or_else(|| {
                        TabletopError::ManaParse {
                            input: notation.to_string(),
                            reason: "colorless amount overflows".to_string(),
                        }
                    })?;
                }
                ManaSymbol::Colored(color) => colored[color.index()] += 1,
            }
        }
        let total = colored
            .iter()
            .try_fold(colorless, |sum, &amount| sum.checked_add(amount));
        if total.is_none() {
            return Err(TabletopError::ManaParse {
                input: notation.to_string(),
                reason: "total amount overflows".to_string(),
            });
        }
        Ok(ManaCost { colorless, colored })
    }

    /// Build a cost from a colorless amount and per-color amounts
    pub fn from_amounts(colorless: u32, colors: &[(Color, u32)]) -> Self {
        let mut colored = [0u32; 5];
        for &(color, amount) in colors {
            colored[color.index()] = colored[color.index()].saturating_add(amount);
        }
        ManaCost { colorless, colored }
    }

    pub fn colorless(&self) -> u32 {
        self.colorless
    }

    pub fn amount(&self, color: Color) -> u32 {
        self.colored[color.index()]
    }

    /// Sum of every colored and colorless amount
    pub fn converted_amount(&self) -> u32 {
        self.colored
            .iter()
            .fold(self.colorless, |sum, &amount| sum.saturating_add(amount))
    }

    pub fn is_empty(&self) -> bool {
        self.converted_amount() == 0
    }
}

impl Default for ManaCost {
    fn default() -> Self {
        ManaCost::EMPTY
    }
}

impl FromStr for ManaCost {
    type Err = TabletopError;

    fn from_str(s: &str) -> Result<Self> {
        ManaCost::parse(s)
    }
}

impl TryFrom<String> for ManaCost {
    type Error = TabletopError;

    fn try_from(s: String) -> Result<Self> {
        ManaCost::parse(&s)
    }
}

impl From<ManaCost> for String {
    fn from(cost: ManaCost) -> Self {
        cost.to_string()
    }
}

impl fmt::Display for ManaCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.colorless > 0 || self.is_empty() {
            write!(f, "{{{}}}", self.colorless)?;
        }
        for color in Color::ALL {
            for _ in 0..self.amount(color) {
                write!(f, "{{{}}}", color.symbol())?;
            }
        }
        Ok(())
    }
}

/// Mana a player has available to spend
///
/// Amounts are unsigned and payment is all-or-nothing, so no amount can
/// ever go negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManaPool {
    colorless: u32,
    colored: [u32; 5],
}

impl ManaPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn colorless(&self) -> u32 {
        self.colorless
    }

    pub fn amount(&self, color: Color) -> u32 {
        self.colored[color.index()]
    }

    pub fn add_color(&mut self, color: Color, amount: u32) {
        self.colored[color.index()] += amount;
    }

    pub fn add_colorless(&mut self, amount: u32) {
        self.colorless += amount;
    }

    /// Merge another pool into this one
    pub fn add(&mut self, other: &ManaPool) {
        self.colorless += other.colorless;
        for (mine, theirs) in self.colored.iter_mut().zip(other.colored.iter()) {
            *mine += *theirs;
        }
    }

    pub fn clear(&mut self) {
        *self = ManaPool::default();
    }

    pub fn total(&self) -> u32 {
        self.colored
            .iter()
            .fold(self.colorless, |sum, &amount| sum.saturating_add(amount))
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Check if the pool covers `cost`
    ///
    /// Colored requirements need mana of that color; the colorless part of
    /// the cost can be paid with anything left over.
    pub fn can_pay(&self, cost: &ManaCost) -> bool {
        let colors_ok = Color::ALL
            .iter()
            .all(|&color| self.amount(color) >= cost.amount(color));
        colors_ok && self.total() >= cost.converted_amount()
    }

    /// Pay `cost` out of this pool
    ///
    /// Colored requirements are paid first. The colorless part then uses
    /// colorless mana before any colored mana, in WUBRG order. The pool is
    /// untouched when it cannot cover the cost.
    pub fn pay(&mut self, cost: &ManaCost) -> std::result::Result<(), String> {
        if !self.can_pay(cost) {
            return Err(format!("cannot pay {cost} from pool {self}"));
        }

        for color in Color::ALL {
            self.colored[color.index()] -= cost.amount(color);
        }

        let mut remaining = cost.colorless();
        let from_colorless = remaining.min(self.colorless);
        self.colorless -= from_colorless;
        remaining -= from_colorless;

        for slot in self.colored.iter_mut() {
            let used = remaining.min(*slot);
            *slot -= used;
            remaining -= used;
        }

        debug_assert_eq!(remaining, 0, "can_pay admitted an unpayable cost");
        Ok(())
    }
}

impl From<&ManaCost> for ManaPool {
    fn from(cost: &ManaCost) -> Self {
        ManaPool {
            colorless: cost.colorless,
            colored: cost.colored,
        }
    }
}

impl fmt::Display for ManaPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}C", self.colorless)?;
        for color in Color::ALL {
            write!(f, " {}{}", self.amount(color), color)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_colorless_and_colors() {
        let cost = ManaCost::parse("{3}{G}{G}").unwrap();
        assert_eq!(cost.colorless(), 3);
        assert_eq!(cost.amount(Color::Green), 2);
        for color in [Color::White, Color::Blue, Color::Black, Color::Red] {
            assert_eq!(cost.amount(color), 0);
        }
        assert_eq!(cost.converted_amount(), 5);
    }

    #[test]
    fn test_parse_any_order_and_case() {
        let cost = ManaCost::parse("{u}{1}{R}{2}{u}").unwrap();
        assert_eq!(cost.colorless(), 3);
        assert_eq!(cost.amount(Color::Blue), 2);
        assert_eq!(cost.amount(Color::Red), 1);
        assert_eq!(cost.converted_amount(), 6);
    }

    #[test]
    fn test_parse_multi_digit_colorless() {
        let cost = ManaCost::parse("{12}").unwrap();
        assert_eq!(cost.colorless(), 12);
        assert_eq!(cost.converted_amount(), 12);
    }

    #[test]
    fn test_parse_rejects_bad_notation() {
        for bad in ["", "3GG", "{X}", "{C}", "{}", "{G", "{G}x", "{G} {G}", "{GG}"] {
            let err = ManaCost::parse(bad).unwrap_err();
            assert!(
                matches!(err, TabletopError::ManaParse { .. }),
                "{bad:?} should fail to parse"
            );
        }
    }

    #[test]
    fn test_parse_rejects_overflowing_totals() {
        for bad in ["{4294967295}{G}", "{4294967295}{1}", "{4294967000}{4294967000}"] {
            let err = ManaCost::parse(bad).unwrap_err();
            assert!(
                matches!(err, TabletopError::ManaParse { .. }),
                "{bad:?} should fail to parse"
            );
        }
        let max = ManaCost::parse("{4294967294}{G}").unwrap();
        assert_eq!(max.converted_amount(), u32::MAX);
        assert!(!ManaPool::new().can_pay(&max));
    }

    #[test]
    fn test_empty_cost() {
        assert_eq!(ManaCost::EMPTY.converted_amount(), 0);
        assert!(ManaCost::EMPTY.is_empty());
        assert_eq!(ManaCost::default(), ManaCost::EMPTY);
        assert_eq!(ManaCost::EMPTY.to_string(), "{0}");
        assert_eq!(ManaCost::parse("{0}").unwrap(), ManaCost::EMPTY);
    }

    #[test]
    fn test_display_is_canonical() {
        let cost = ManaCost::parse("{G}{2}{W}{G}").unwrap();
        assert_eq!(cost.to_string(), "{2}{W}{G}{G}");
        assert_eq!(ManaCost::parse(&cost.to_string()).unwrap(), cost);
    }

    #[test]
    fn test_cost_serializes_as_notation() {
        let cost = ManaCost::parse("{1}{R}").unwrap();
        let json = serde_json::to_string(&cost).unwrap();
        assert_eq!(json, "\"{1}{R}\"");
        assert!(serde_json::from_str::<ManaCost>("\"{Q}\"").is_err());
    }

    #[test]
    fn test_pool_add() {
        let mut pool = ManaPool::new();
        pool.add_color(Color::Red, 1);

        let mut other = ManaPool::new();
        other.add_color(Color::Red, 2);
        other.add_colorless(1);

        pool.add(&other);
        assert_eq!(pool.amount(Color::Red), 3);
        assert_eq!(pool.colorless(), 1);
        assert_eq!(pool.total(), 4);
    }

    #[test]
    fn test_pool_from_cost() {
        let pool = ManaPool::from(&ManaCost::parse("{2}{G}").unwrap());
        assert_eq!(pool.colorless(), 2);
        assert_eq!(pool.amount(Color::Green), 1);
    }

    #[test]
    fn test_can_pay() {
        let mut pool = ManaPool::new();
        pool.add_color(Color::Red, 2);
        pool.add_color(Color::Blue, 1);

        assert!(pool.can_pay(&ManaCost::parse("{1}{R}").unwrap()));
        assert!(pool.can_pay(&ManaCost::parse("{2}{R}").unwrap()));
        assert!(!pool.can_pay(&ManaCost::parse("{3}{R}").unwrap()));
        assert!(!pool.can_pay(&ManaCost::parse("{R}{R}{R}").unwrap()));
        assert!(pool.can_pay(&ManaCost::EMPTY));
    }

    #[test]
    fn test_pay_prefers_colorless_for_generic() {
        let mut pool = ManaPool::new();
        pool.add_color(Color::Green, 2);
        pool.add_colorless(1);

        pool.pay(&ManaCost::parse("{1}{G}").unwrap()).unwrap();
        assert_eq!(pool.colorless(), 0);
        assert_eq!(pool.amount(Color::Green), 1);
    }

    #[test]
    fn test_pay_generic_in_wubrg_order() {
        let mut pool = ManaPool::new();
        pool.add_color(Color::Red, 3);
        pool.add_color(Color::Blue, 1);

        pool.pay(&ManaCost::parse("{2}{R}").unwrap()).unwrap();
        assert_eq!(pool.amount(Color::Blue), 0);
        assert_eq!(pool.amount(Color::Red), 1);
        assert_eq!(pool.total(), 1);
    }

    #[test]
    fn test_pay_insufficient_leaves_pool_unchanged() {
        let mut pool = ManaPool::new();
        pool.add_color(Color::Blue, 2);
        let before = pool;

        assert!(pool.pay(&ManaCost::parse("{R}{R}").unwrap()).is_err());
        assert!(pool.pay(&ManaCost::parse("{3}").unwrap()).is_err());
        assert_eq!(pool, before);
    }

    #[test]
    fn test_clear() {
        let mut pool = ManaPool::new();
        pool.add_color(Color::White, 4);
        pool.clear();
        assert!(pool.is_empty());
    }
}
