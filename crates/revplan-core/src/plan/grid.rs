use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{sum_money, Money};

pub const MONTHS_PER_YEAR: usize = 12;

/// Fiscal years covered by the revenue plan.
pub const PLAN_YEARS: usize = 5;

pub const GRID_SLOTS: usize = MONTHS_PER_YEAR * PLAN_YEARS;

/// Form field stems, January first.
pub const MONTH_KEYS: [&str; MONTHS_PER_YEAR] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

pub const MONTH_LABELS: [&str; MONTHS_PER_YEAR] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Slot of `(year_offset, month_index)`, both 0-based.
///
/// Year 1 occupies slots 0..12, year 2 slots 12..24 and so on.
pub const fn slot_index(year_offset: usize, month_index: usize) -> Option<usize> {
    if year_offset < PLAN_YEARS && month_index < MONTHS_PER_YEAR {
        Some(year_offset * MONTHS_PER_YEAR + month_index)
    } else {
        None
    }
}

/// Inverse of [`slot_index`].
pub const fn slot_position(slot: usize) -> (usize, usize) {
    (slot / MONTHS_PER_YEAR, slot % MONTHS_PER_YEAR)
}

/// Form field of a slot: `jan` .. `dec` for year 1, `jan_y2` .. `dec_y5` after.
pub fn field_name(slot: usize) -> String {
    let (year, month) = slot_position(slot);
    match year {
        0 => MONTH_KEYS[month].to_string(),
        _ => format!("{}_y{}", MONTH_KEYS[month], year + 1),
    }
}

/// Storage column of a slot: `jan_plan` .. `dec_plan`, then `jan_plan_y2` ..
pub fn column_name(slot: usize) -> String {
    let (year, month) = slot_position(slot);
    match year {
        0 => format!("{}_plan", MONTH_KEYS[month]),
        _ => format!("{}_plan_y{}", MONTH_KEYS[month], year + 1),
    }
}

/// Slot addressed by a form field name, the inverse of [`field_name`].
pub fn slot_for_field(name: &str) -> Option<usize> {
    let (stem, year_offset) = match name.split_once("_y") {
        Some((stem, year)) => {
            let year: usize = year.parse().ok()?;
            if year < 2 {
                return None;
            }
            (stem, year - 1)
        }
        None => (name, 0),
    };
    let month = MONTH_KEYS.iter().position(|k| *k == stem)?;
    slot_index(year_offset, month)
}

/// Monthly revenue plan: 60 accumulators, one per month of the 5-year horizon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueGrid {
    slots: [Money; GRID_SLOTS],
}

impl Default for RevenueGrid {
    fn default() -> Self {
        RevenueGrid {
            slots: [0; GRID_SLOTS],
        }
    }
}

impl RevenueGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid holding only a persisted year-1 plan.
    pub fn from_year_one(months: [Money; MONTHS_PER_YEAR]) -> Self {
        let mut grid = Self::default();
        grid.slots[..MONTHS_PER_YEAR].copy_from_slice(&months);
        grid
    }

    pub fn clear(&mut self) {
        self.slots = [0; GRID_SLOTS];
    }

    pub(crate) fn add(&mut self, slot: usize, amount: Money) {
        self.slots[slot] = self.slots[slot].saturating_add(amount);
    }

    pub fn get(&self, year_offset: usize, month_index: usize) -> Option<Money> {
        slot_index(year_offset, month_index).map(|s| self.slots[s])
    }

    pub fn slots(&self) -> &[Money; GRID_SLOTS] {
        &self.slots
    }

    /// The 12 months of one fiscal year (0-based). Out-of-range years are all zero.
    pub fn year(&self, year_offset: usize) -> [Money; MONTHS_PER_YEAR] {
        let mut months = [0; MONTHS_PER_YEAR];
        if year_offset < PLAN_YEARS {
            let start = year_offset * MONTHS_PER_YEAR;
            months.copy_from_slice(&self.slots[start..start + MONTHS_PER_YEAR]);
        }
        months
    }

    pub fn year_total(&self, year_offset: usize) -> Money {
        sum_money(self.year(year_offset))
    }

    /// Sum of every slot; this is the contract value.
    pub fn total(&self) -> Money {
        sum_money(self.slots)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|v| *v == 0)
    }

    /// `(field name, amount)` for all 60 slots in grid order.
    pub fn month_fields(&self) -> Vec<(String, Money)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(slot, amount)| (field_name(slot), *amount))
            .collect()
    }
}

impl Serialize for RevenueGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.slots.iter())
    }
}

impl<'de> Deserialize<'de> for RevenueGrid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<Money>::deserialize(deserializer)?;
        let slots: [Money; GRID_SLOTS] = values.try_into().map_err(|v: Vec<Money>| {
            serde::de::Error::invalid_length(v.len(), &"60 monthly amounts")
        })?;
        Ok(RevenueGrid { slots })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_lookup_bounds() {
        assert_eq!(slot_index(0, 0), Some(0));
        assert_eq!(slot_index(0, 11), Some(11));
        assert_eq!(slot_index(1, 0), Some(12));
        assert_eq!(slot_index(4, 11), Some(59));
        assert_eq!(slot_index(5, 0), None);
        assert_eq!(slot_index(0, 12), None);
        assert_eq!(slot_position(37), (3, 1));
    }

    #[test]
    fn test_field_and_column_names() {
        assert_eq!(field_name(0), "jan");
        assert_eq!(field_name(11), "dec");
        assert_eq!(field_name(12), "jan_y2");
        assert_eq!(field_name(59), "dec_y5");
        assert_eq!(column_name(2), "mar_plan");
        assert_eq!(column_name(14), "mar_plan_y2");
    }

    #[test]
    fn test_slot_for_field_inverts_field_name() {
        for slot in 0..GRID_SLOTS {
            assert_eq!(slot_for_field(&field_name(slot)), Some(slot));
        }
        assert_eq!(slot_for_field("jan_y1"), None);
        assert_eq!(slot_for_field("jan_y6"), None);
        assert_eq!(slot_for_field("january"), None);
    }

    #[test]
    fn test_year_slices_and_totals() {
        let mut grid = RevenueGrid::new();
        grid.add(0, 5);
        grid.add(13, 7);
        grid.add(59, 11);
        assert_eq!(grid.year(0)[0], 5);
        assert_eq!(grid.year(1)[1], 7);
        assert_eq!(grid.year(4)[11], 11);
        assert_eq!(grid.year(7), [0; MONTHS_PER_YEAR]);
        assert_eq!(grid.year_total(1), 7);
        assert_eq!(grid.total(), 23);
        grid.clear();
        assert!(grid.is_empty());
    }

    #[test]
    fn test_serde_requires_sixty_slots() {
        let grid = RevenueGrid::from_year_one([1; MONTHS_PER_YEAR]);
        let json = serde_json::to_string(&grid).unwrap();
        let back: RevenueGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
        assert!(serde_json::from_str::<RevenueGrid>("[1,2,3]").is_err());
    }
}
