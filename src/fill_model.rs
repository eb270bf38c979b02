//! Fill odds by order side and age.
//!
//! The simulator has no market data. Whether an order fills on a given tick
//! depends only on its side and how long it has been open:
//!
//! | Side | `[0,60)` s | `[60,120)` s | `[120,180)` s | `180` s + |
//! |------|-----------|--------------|---------------|-----------|
//! | Buy  | 100 / 49  | 49 / 49      | 99 / 14       | never     |
//! | Sell | 100 / 4   | 4 / 4        | 4 / 4         | never     |
//!
//! Each cell is `fulfill / partly_fill`, counted in faces of a 100-sided die.

use rand::Rng;

use crate::OrderSide;

/// Lower bound of a partial-fill draw.
pub const PARTIAL_FILL_EPSILON: f64 = 0.0001;

/// Time-since-open range used to pick fill odds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgeBucket {
    /// `[0, 60)` seconds
    Fresh,
    /// `[60, 120)` seconds
    Young,
    /// `[120, 180)` seconds
    Mature,
    /// 180 seconds and older
    Stale,
}

impl AgeBucket {
    /// Classify an age in seconds. Negative ages count as fresh.
    pub fn of(age_secs: f64) -> Self {
        if age_secs < 60.0 {
            AgeBucket::Fresh
        } else if age_secs < 120.0 {
            AgeBucket::Young
        } else if age_secs < 180.0 {
            AgeBucket::Mature
        } else {
            AgeBucket::Stale
        }
    }

    fn index(self) -> Option<usize> {
        match self {
            AgeBucket::Fresh => Some(0),
            AgeBucket::Young => Some(1),
            AgeBucket::Mature => Some(2),
            AgeBucket::Stale => None,
        }
    }
}

/// Chances of each outcome, in faces of a 1..=100 die.
///
/// A roll `d` selects the outcome iff `d <= odds`, so `100` always hits and
/// `0` never does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Odds {
    pub fulfill: u8,
    pub partly_fill: u8,
}

impl Odds {
    pub const NEVER: Odds = Odds::new(0, 0);

    pub const fn new(fulfill: u8, partly_fill: u8) -> Self {
        Self {
            fulfill,
            partly_fill,
        }
    }
}

/// What the simulator does to an open order on one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Fulfill,
    PartlyFill,
    Nothing,
}

/// Odds per side for the three non-stale buckets. Stale orders never move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FillTable {
    buy: [Odds; 3],
    sell: [Odds; 3],
}

impl Default for FillTable {
    fn default() -> Self {
        Self {
            buy: [Odds::new(100, 49), Odds::new(49, 49), Odds::new(99, 14)],
            sell: [Odds::new(100, 4), Odds::new(4, 4), Odds::new(4, 4)],
        }
    }
}

impl FillTable {
    /// Build a table from explicit `[fresh, young, mature]` odds per side.
    pub fn new(buy: [Odds; 3], sell: [Odds; 3]) -> Self {
        Self { buy, sell }
    }

    /// Same odds for every side and non-stale bucket.
    pub fn uniform(odds: Odds) -> Self {
        Self::new([odds; 3], [odds; 3])
    }

    /// Odds for a side and bucket.
    pub fn odds(&self, side: OrderSide, bucket: AgeBucket) -> Odds {
        let row = match side {
            OrderSide::LimitBuy => &self.buy,
            OrderSide::LimitSell => &self.sell,
        };
        bucket.index().map_or(Odds::NEVER, |i| row[i])
    }

    /// Roll the outcome for one order.
    ///
    /// Fulfill is tested first. Only if it misses is a second, independent
    /// roll made for partly-fill; if that misses too nothing happens.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        side: OrderSide,
        age_secs: f64,
        rng: &mut R,
    ) -> Outcome {
        let bucket = AgeBucket::of(age_secs);
        if bucket == AgeBucket::Stale {
            return Outcome::Nothing;
        }
        let odds = self.odds(side, bucket);
        if roll(rng) <= odds.fulfill {
            return Outcome::Fulfill;
        }
        if roll(rng) <= odds.partly_fill {
            return Outcome::PartlyFill;
        }
        Outcome::Nothing
    }
}

fn roll<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(1..=100)
}

/// Draw the new remaining quantity after a partial fill.
///
/// The draw replaces the remaining quantity outright: it is uniform between
/// [`PARTIAL_FILL_EPSILON`] and `remaining`, capped at `quantity`. Below the
/// epsilon the bounds swap, so a tiny remainder can grow back towards it.
pub fn partial_remaining<R: Rng + ?Sized>(remaining: f64, quantity: f64, rng: &mut R) -> f64 {
    let (low, high) = if remaining >= PARTIAL_FILL_EPSILON {
        (PARTIAL_FILL_EPSILON, remaining)
    } else {
        (remaining, PARTIAL_FILL_EPSILON)
    };
    let drawn = if low < high {
        rng.gen_range(low..high)
    } else {
        low
    };
    drawn.min(quantity)
}
