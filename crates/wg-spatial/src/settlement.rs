//! The read-only view of a settlement that analysis needs.
//!
//! Settlements are owned by whatever storage layer the application uses.
//! The analyzer only ever asks one question of them, "where are you, if
//! anywhere?", so that is the whole trait.

use wg_core::GeoPoint;

/// Anything with an optional geographic position.
pub trait Settlement {
    fn location(&self) -> Option<GeoPoint>;
}

impl Settlement for GeoPoint {
    #[inline]
    fn location(&self) -> Option<GeoPoint> {
        Some(*self)
    }
}

impl Settlement for Option<GeoPoint> {
    #[inline]
    fn location(&self) -> Option<GeoPoint> {
        *self
    }
}

impl<S: Settlement + ?Sized> Settlement for &S {
    #[inline]
    fn location(&self) -> Option<GeoPoint> {
        (**self).location()
    }
}

/// A plain settlement record, as produced by the CSV loader.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SettlementRecord {
    pub id:       u64,
    pub name:     String,
    pub location: Option<GeoPoint>,
}

impl Settlement for SettlementRecord {
    #[inline]
    fn location(&self) -> Option<GeoPoint> {
        self.location
    }
}

/// Iterate over the positions of the settlements that have one, paired with
/// their index in `settlements`.
pub(crate) fn located<S: Settlement>(settlements: &[S]) -> impl Iterator<Item = (usize, GeoPoint)> + '_ {
    settlements
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.location().map(|p| (i, p)))
}
