//! Players: colors, seats, resources and barracks.
//!
//! ## Seats
//!
//! `SeatIndex` is the stable addressing key for a player. Seats are
//! fixed once at setup (the seeded RNG decides which color sits where)
//! and every command names the seat that issued it.
//!
//! ## SeatMap
//!
//! Per-seat storage backed by a `Vec` for O(1) access.
//!
//! ## PlayerState
//!
//! The only legal path for resource and barracks changes. Each mutation
//! emits a `tracing` event so a subscriber sees every change in order.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::error::RuleViolation;
use crate::zones::PileSet;

/// Player color. A color is a player's identity on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerColor {
    Red,
    Blue,
    Green,
    Yellow,
    White,
}

impl PlayerColor {
    /// All colors in declaration order.
    pub const ALL: [PlayerColor; 5] = [
        PlayerColor::Red,
        PlayerColor::Blue,
        PlayerColor::Green,
        PlayerColor::Yellow,
        PlayerColor::White,
    ];
}

impl std::fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PlayerColor::Red => "Red",
            PlayerColor::Blue => "Blue",
            PlayerColor::Green => "Green",
            PlayerColor::Yellow => "Yellow",
            PlayerColor::White => "White",
        };
        f.write_str(name)
    }
}

/// Stable player slot, assigned once at setup.
///
/// Seat indices are 0-based and also give turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatIndex(pub u8);

impl SeatIndex {
    /// Create a new seat index.
    #[must_use]
    pub const fn new(seat: u8) -> Self {
        Self(seat)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all seats for a match with `seat_count` players.
    pub fn all(seat_count: usize) -> impl Iterator<Item = SeatIndex> {
        (0..seat_count as u8).map(SeatIndex)
    }

    /// The seat that plays after this one.
    #[must_use]
    pub fn next(self, seat_count: usize) -> SeatIndex {
        SeatIndex(((self.index() + 1) % seat_count) as u8)
    }
}

impl std::fmt::Display for SeatIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Per-seat data storage with O(1) access.
///
/// ```
/// use rust_sitewar::core::{SeatIndex, SeatMap};
///
/// let mut scores: SeatMap<u32> = SeatMap::new(3, |_| 0);
/// scores[SeatIndex::new(1)] += 4;
/// assert_eq!(scores[SeatIndex::new(1)], 4);
/// assert_eq!(scores.seat_count(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: Vec<T>,
}

impl<T> SeatMap<T> {
    /// Create a new SeatMap with values from a factory function.
    pub fn new(seat_count: usize, factory: impl Fn(SeatIndex) -> T) -> Self {
        assert!(seat_count > 0, "Must have at least 1 seat");
        assert!(seat_count <= 255, "At most 255 seats supported");

        let data = (0..seat_count as u8).map(|i| factory(SeatIndex(i))).collect();
        Self { data }
    }

    /// Build from values already ordered by seat.
    pub fn from_vec(data: Vec<T>) -> Self {
        assert!(!data.is_empty(), "Must have at least 1 seat");
        Self { data }
    }

    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn get(&self, seat: SeatIndex) -> Option<&T> {
        self.data.get(seat.index())
    }

    pub fn get_mut(&mut self, seat: SeatIndex) -> Option<&mut T> {
        self.data.get_mut(seat.index())
    }

    /// Iterate over (SeatIndex, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (SeatIndex, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (SeatIndex(i as u8), v))
    }

    /// Iterate over (SeatIndex, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SeatIndex, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (SeatIndex(i as u8), v))
    }
}

impl<T> Index<SeatIndex> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: SeatIndex) -> &Self::Output {
        &self.data[seat.index()]
    }
}

impl<T> IndexMut<SeatIndex> for SeatMap<T> {
    fn index_mut(&mut self, seat: SeatIndex) -> &mut Self::Output {
        &mut self.data[seat.index()]
    }
}

/// A spendable or scoring resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Power,
    Influence,
    VictoryPoints,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Resource::Power => "Power",
            Resource::Influence => "Influence",
            Resource::VictoryPoints => "VictoryPoints",
        };
        f.write_str(name)
    }
}

/// One player's resources, barracks, trophies and card piles.
///
/// Resource counts never go negative: `try_spend` refuses to overdraw
/// and `deduct` clamps at zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub color: PlayerColor,
    pub seat: SeatIndex,
    power: u32,
    influence: u32,
    victory_points: u32,
    troops_in_barracks: u32,
    spies_in_barracks: u32,
    /// Colors of enemy troops this player has assassinated.
    trophies: Vec<PlayerColor>,
    piles: PileSet,
}

impl PlayerState {
    /// Create a player with empty resources and the given barracks.
    #[must_use]
    pub fn new(color: PlayerColor, seat: SeatIndex, troops: u32, spies: u32) -> Self {
        Self {
            color,
            seat,
            power: 0,
            influence: 0,
            victory_points: 0,
            troops_in_barracks: troops,
            spies_in_barracks: spies,
            trophies: Vec::new(),
            piles: PileSet::new(),
        }
    }

    // === Resources ===

    /// Current amount of a resource.
    #[must_use]
    pub fn resource(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Power => self.power,
            Resource::Influence => self.influence,
            Resource::VictoryPoints => self.victory_points,
        }
    }

    fn resource_mut(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Power => &mut self.power,
            Resource::Influence => &mut self.influence,
            Resource::VictoryPoints => &mut self.victory_points,
        }
    }

    /// Add to a resource.
    pub fn gain(&mut self, resource: Resource, amount: u32) {
        let slot = self.resource_mut(resource);
        *slot = slot.saturating_add(amount);
        tracing::debug!(color = %self.color, %resource, amount, "resource gained");
    }

    /// Check that `amount` of `resource` can be spent, without spending it.
    pub fn can_spend(&self, resource: Resource, amount: u32) -> Result<(), RuleViolation> {
        let available = self.resource(resource);
        if available < amount {
            return Err(RuleViolation::InsufficientResource {
                resource,
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    /// Spend a resource, failing without change if there is not enough.
    pub fn try_spend(&mut self, resource: Resource, amount: u32) -> Result<(), RuleViolation> {
        self.can_spend(resource, amount)?;
        *self.resource_mut(resource) -= amount;
        tracing::debug!(color = %self.color, %resource, amount, "resource spent");
        Ok(())
    }

    /// Remove a resource, clamping at zero.
    pub fn deduct(&mut self, resource: Resource, amount: u32) {
        let slot = self.resource_mut(resource);
        *slot = slot.saturating_sub(amount);
        tracing::debug!(color = %self.color, %resource, amount, "resource deducted");
    }

    // === Barracks ===

    #[must_use]
    pub fn troops_in_barracks(&self) -> u32 {
        self.troops_in_barracks
    }

    #[must_use]
    pub fn spies_in_barracks(&self) -> u32 {
        self.spies_in_barracks
    }

    /// Take one troop out of barracks for deployment.
    pub fn take_troop(&mut self) -> Result<(), RuleViolation> {
        if self.troops_in_barracks == 0 {
            return Err(RuleViolation::NoTroopsInBarracks);
        }
        self.troops_in_barracks -= 1;
        Ok(())
    }

    /// Put one troop back into barracks.
    pub fn return_troop(&mut self) {
        self.troops_in_barracks += 1;
    }

    /// Take one spy out of barracks.
    pub fn take_spy(&mut self) -> Result<(), RuleViolation> {
        if self.spies_in_barracks == 0 {
            return Err(RuleViolation::NoSpiesInBarracks);
        }
        self.spies_in_barracks -= 1;
        Ok(())
    }

    /// Put one spy back into barracks.
    pub fn return_spy(&mut self) {
        self.spies_in_barracks += 1;
    }

    // === Trophies ===

    /// Record an assassinated enemy troop.
    pub fn add_trophy(&mut self, victim: PlayerColor) {
        self.trophies.push(victim);
        tracing::debug!(color = %self.color, %victim, "trophy taken");
    }

    #[must_use]
    pub fn trophies(&self) -> &[PlayerColor] {
        &self.trophies
    }

    // === Piles ===

    #[must_use]
    pub fn piles(&self) -> &PileSet {
        &self.piles
    }

    pub(crate) fn piles_mut(&mut self) -> &mut PileSet {
        &mut self.piles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> PlayerState {
        PlayerState::new(PlayerColor::Red, SeatIndex::new(0), 40, 5)
    }

    #[test]
    fn test_seat_basics() {
        let seat = SeatIndex::new(1);
        assert_eq!(seat.index(), 1);
        assert_eq!(format!("{}", seat), "Seat 1");
        assert_eq!(seat.next(2), SeatIndex::new(0));
        assert_eq!(seat.next(3), SeatIndex::new(2));
    }

    #[test]
    fn test_seat_all() {
        let seats: Vec<_> = SeatIndex::all(3).collect();
        assert_eq!(seats, vec![SeatIndex::new(0), SeatIndex::new(1), SeatIndex::new(2)]);
    }

    #[test]
    fn test_seat_map() {
        let mut map: SeatMap<u32> = SeatMap::new(3, |s| s.index() as u32 * 10);
        assert_eq!(map[SeatIndex::new(2)], 20);
        map[SeatIndex::new(0)] = 5;
        assert_eq!(map.get(SeatIndex::new(0)), Some(&5));
        assert_eq!(map.get(SeatIndex::new(9)), None);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs[1], (SeatIndex::new(1), &10));
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 seat")]
    fn test_seat_map_zero_seats() {
        let _: SeatMap<u32> = SeatMap::new(0, |_| 0);
    }

    #[test]
    fn test_gain_and_spend() {
        let mut player = red();
        player.gain(Resource::Power, 4);
        assert_eq!(player.resource(Resource::Power), 4);

        assert!(player.try_spend(Resource::Power, 3).is_ok());
        assert_eq!(player.resource(Resource::Power), 1);
    }

    #[test]
    fn test_failed_spend_leaves_resource() {
        let mut player = red();
        player.gain(Resource::Influence, 2);

        let err = player.try_spend(Resource::Influence, 5).unwrap_err();
        assert_eq!(
            err,
            RuleViolation::InsufficientResource {
                resource: Resource::Influence,
                needed: 5,
                available: 2,
            }
        );
        assert_eq!(player.resource(Resource::Influence), 2);
    }

    #[test]
    fn test_deduct_clamps_at_zero() {
        let mut player = red();
        player.gain(Resource::VictoryPoints, 2);
        player.deduct(Resource::VictoryPoints, 10);
        assert_eq!(player.resource(Resource::VictoryPoints), 0);
    }

    #[test]
    fn test_barracks() {
        let mut player = PlayerState::new(PlayerColor::Blue, SeatIndex::new(1), 1, 0);
        assert!(player.take_troop().is_ok());
        assert_eq!(player.take_troop(), Err(RuleViolation::NoTroopsInBarracks));
        player.return_troop();
        assert_eq!(player.troops_in_barracks(), 1);

        assert_eq!(player.take_spy(), Err(RuleViolation::NoSpiesInBarracks));
        player.return_spy();
        assert!(player.take_spy().is_ok());
    }

    #[test]
    fn test_trophies() {
        let mut player = red();
        player.add_trophy(PlayerColor::Blue);
        player.add_trophy(PlayerColor::White);
        assert_eq!(player.trophies(), &[PlayerColor::Blue, PlayerColor::White]);
    }

    #[test]
    fn test_color_display() {
        assert_eq!(format!("{}", PlayerColor::Yellow), "Yellow");
        assert_eq!(format!("{}", Resource::Power), "Power");
    }
}
