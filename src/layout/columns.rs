//! Column model and the two-pass star-sizing layout.
//!
//! Columns are stored by identity and shown through a separate display order.
//! The first `frozen_count` display positions form the frozen prefix; every
//! other position scrolls horizontally. After each pass the set keeps a
//! prefix-sum table over the display order so edges are O(1) lookups.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::size_spec::{Resolution, SizeConstraints, SizeSpec};
use crate::error::{GridError, Result};

/// Default fixed column width in pixels
pub const DEFAULT_COL_WIDTH: f32 = 100.0;

/// Default minimum column width in pixels
pub const MIN_COL_WIDTH: f32 = 20.0;

/// Star passes stop refining once the total clamp violation is below this.
const STAR_EPSILON: f32 = 0.01;

/// Host-facing definition of a column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnDef {
    pub size: SizeSpec,
    pub bounds: SizeConstraints,
    pub visible: bool,
}

impl Default for ColumnDef {
    fn default() -> Self {
        Self {
            size: SizeSpec::Fixed(DEFAULT_COL_WIDTH),
            bounds: SizeConstraints::UNBOUNDED.with_min(MIN_COL_WIDTH),
            visible: true,
        }
    }
}

impl ColumnDef {
    pub fn fixed(width: f32) -> Self {
        Self {
            size: SizeSpec::Fixed(width),
            ..Self::default()
        }
    }

    pub fn auto() -> Self {
        Self {
            size: SizeSpec::Auto,
            ..Self::default()
        }
    }

    pub fn star(weight: f32) -> Self {
        Self {
            size: SizeSpec::Proportional(weight),
            ..Self::default()
        }
    }

    /// Replace the min/max bounds, validating them.
    pub fn with_bounds(mut self, min: f32, max: f32) -> Result<Self> {
        self.bounds = SizeConstraints::new(min, max)?;
        Ok(self)
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.size.validate()
    }
}

/// A column with its resolved layout state.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    id: usize,
    def: ColumnDef,
    display_index: usize,
    actual_width: f32,
    /// Widest natural width reported for any realized row (auto-grow).
    natural_width: f32,
    header_width: Option<f32>,
    /// Realized rows have reported this column's natural width.
    cells_measured: bool,
}

impl Column {
    fn new(id: usize, def: ColumnDef) -> Self {
        Self {
            id,
            def,
            display_index: id,
            actual_width: 0.0,
            natural_width: 0.0,
            header_width: None,
            cells_measured: false,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn def(&self) -> &ColumnDef {
        &self.def
    }

    pub fn size(&self) -> SizeSpec {
        self.def.size
    }

    pub fn bounds(&self) -> SizeConstraints {
        self.def.bounds
    }

    pub fn is_visible(&self) -> bool {
        self.def.visible
    }

    pub fn display_index(&self) -> usize {
        self.display_index
    }

    /// Resolved width from the last layout pass (0 for hidden columns).
    pub fn actual_width(&self) -> f32 {
        self.actual_width
    }

    /// Natural content width seen so far, including the header.
    pub fn natural_width(&self) -> f32 {
        self.natural_width.max(self.header_width.unwrap_or(0.0))
    }
}

/// Summary of one column layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnPass {
    /// Width taken by fixed and auto columns
    pub used_width: f32,
    /// Sum of deferred proportional weights
    pub star_weight: f32,
    /// Width of every visible column
    pub total_width: f32,
    /// Width of the frozen prefix
    pub frozen_width: f32,
}

#[derive(Debug, Clone, Copy)]
struct StarItem {
    id: usize,
    weight: f32,
    bounds: SizeConstraints,
    width: f32,
}

/// Ordered set of columns with a frozen display prefix.
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    columns: Vec<Column>,
    /// display position -> identity
    display_order: Vec<usize>,
    frozen_count: usize,
    /// `positions[p]` = left edge of display position `p`; one extra trailing edge
    positions: Vec<f32>,
}

impl ColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from definitions, in identity == display order.
    pub fn from_defs(defs: &[ColumnDef]) -> Result<Self> {
        let mut set = Self::new();
        for def in defs {
            set.push(*def)?;
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column by identity.
    pub fn get(&self, id: usize) -> Option<&Column> {
        self.columns.get(id)
    }

    /// Columns in identity order.
    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Columns in display order.
    pub fn iter_display(&self) -> impl Iterator<Item = &Column> {
        self.display_order
            .iter()
            .filter_map(move |&id| self.columns.get(id))
    }

    pub fn display_order(&self) -> &[usize] {
        &self.display_order
    }

    /// Identity at a display position.
    pub fn id_at(&self, pos: usize) -> Option<usize> {
        self.display_order.get(pos).copied()
    }

    pub fn column_at(&self, pos: usize) -> Option<&Column> {
        self.id_at(pos).and_then(|id| self.columns.get(id))
    }

    pub fn frozen_count(&self) -> usize {
        self.frozen_count
    }

    pub fn is_frozen(&self, id: usize) -> bool {
        self.columns
            .get(id)
            .is_some_and(|c| c.display_index < self.frozen_count)
    }

    fn check_id(&self, id: usize) -> Result<()> {
        if id < self.columns.len() {
            Ok(())
        } else {
            Err(GridError::ColumnOutOfRange {
                col: id,
                count: self.columns.len(),
            })
        }
    }

    // ------------------------------------------------------------------
    // Structural edits
    // ------------------------------------------------------------------

    /// Append a column at the end of both identity and display order.
    pub fn push(&mut self, def: ColumnDef) -> Result<usize> {
        def.validate()?;
        let id = self.columns.len();
        self.columns.push(Column::new(id, def));
        self.display_order.push(id);
        self.reindex();
        Ok(id)
    }

    /// Insert a column at identity `at`, shifting later identities up.
    ///
    /// The new column takes the display position of the column that
    /// previously had identity `at` (or the end when appending). Inserting
    /// inside the frozen prefix grows it.
    pub fn insert(&mut self, at: usize, def: ColumnDef) -> Result<()> {
        def.validate()?;
        if at > self.columns.len() {
            return Err(GridError::ColumnOutOfRange {
                col: at,
                count: self.columns.len(),
            });
        }
        let pos = self
            .columns
            .get(at)
            .map_or(self.display_order.len(), |c| c.display_index);
        for id in &mut self.display_order {
            if *id >= at {
                *id += 1;
            }
        }
        self.columns.insert(at, Column::new(at, def));
        self.display_order.insert(pos, at);
        if pos < self.frozen_count {
            self.frozen_count += 1;
        }
        self.reindex();
        Ok(())
    }

    /// Remove the column with identity `id`, shifting later identities down.
    pub fn remove(&mut self, id: usize) -> Result<Column> {
        self.check_id(id)?;
        let removed = self.columns.remove(id);
        let pos = removed.display_index;
        if pos < self.display_order.len() {
            self.display_order.remove(pos);
        }
        for other in &mut self.display_order {
            if *other > id {
                *other -= 1;
            }
        }
        if pos < self.frozen_count {
            self.frozen_count -= 1;
        }
        self.reindex();
        Ok(removed)
    }

    /// Move the column at display position `from` to display position `to`.
    ///
    /// The frozen prefix keeps its length, so a column dragged across the
    /// boundary swaps frozen-ness with its neighbour.
    pub fn move_to(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.display_order.len();
        if from >= len || to >= len {
            return Err(GridError::ColumnOutOfRange {
                col: from.max(to),
                count: len,
            });
        }
        let id = self.display_order.remove(from);
        self.display_order.insert(to, id);
        self.reindex();
        Ok(())
    }

    pub fn set_frozen_count(&mut self, count: usize) -> Result<()> {
        if count > self.columns.len() {
            return Err(GridError::ColumnOutOfRange {
                col: count,
                count: self.columns.len(),
            });
        }
        self.frozen_count = count;
        self.rebuild_positions();
        Ok(())
    }

    pub fn set_size(&mut self, id: usize, size: SizeSpec) -> Result<()> {
        size.validate()?;
        self.check_id(id)?;
        if let Some(col) = self.columns.get_mut(id) {
            if col.def.size != size {
                col.cells_measured = false;
            }
            col.def.size = size;
        }
        Ok(())
    }

    pub fn set_bounds(&mut self, id: usize, bounds: SizeConstraints) -> Result<()> {
        self.check_id(id)?;
        if let Some(col) = self.columns.get_mut(id) {
            col.def.bounds = bounds;
        }
        Ok(())
    }

    pub fn set_visible(&mut self, id: usize, visible: bool) -> Result<()> {
        self.check_id(id)?;
        if let Some(col) = self.columns.get_mut(id) {
            if visible && !col.def.visible {
                col.cells_measured = false;
            }
            col.def.visible = visible;
        }
        Ok(())
    }

    fn reindex(&mut self) {
        for (id, col) in self.columns.iter_mut().enumerate() {
            col.id = id;
        }
        for (pos, &id) in self.display_order.iter().enumerate() {
            if let Some(col) = self.columns.get_mut(id) {
                col.display_index = pos;
            }
        }
        self.frozen_count = self.frozen_count.min(self.columns.len());
        self.rebuild_positions();
    }

    // ------------------------------------------------------------------
    // Measurement bookkeeping
    // ------------------------------------------------------------------

    /// Whether any visible column needs the measurement callback when laid
    /// out against `available` width.
    pub fn has_measured_columns(&self, available: f32) -> bool {
        self.columns
            .iter()
            .any(|c| c.def.visible && c.def.size.needs_measure(available))
    }

    /// Visible columns that need natural widths but have not yet been
    /// measured against the realized rows.
    pub fn pending_measure(&self, available: f32) -> Vec<usize> {
        self.columns
            .iter()
            .filter(|c| !c.cells_measured && c.def.visible && c.def.size.needs_measure(available))
            .map(|c| c.id)
            .collect()
    }

    pub fn mark_cells_measured(&mut self, ids: &[usize]) {
        for &id in ids {
            if let Some(col) = self.columns.get_mut(id) {
                col.cells_measured = true;
            }
        }
    }

    /// Width constraint handed to the cell measurement callback.
    pub fn measure_constraint(&self, id: usize, available: f32) -> f32 {
        let Some(col) = self.columns.get(id) else {
            return f32::INFINITY;
        };
        match col.def.size {
            SizeSpec::Fixed(v) => col.def.bounds.clamp(v),
            SizeSpec::Proportional(_) if available.is_finite() && col.actual_width > 0.0 => {
                col.actual_width
            }
            SizeSpec::Auto | SizeSpec::Proportional(_) => col.def.bounds.max(),
        }
    }

    /// Record a natural width from a realized cell; auto columns only grow.
    pub fn note_natural_width(&mut self, id: usize, width: f32) {
        if let Some(col) = self.columns.get_mut(id) {
            if width.is_finite() && width > col.natural_width {
                col.natural_width = width;
            }
        }
    }

    pub fn needs_header_measure(&self, id: usize, available: f32) -> bool {
        self.columns.get(id).is_some_and(|c| {
            c.def.visible && c.header_width.is_none() && c.def.size.needs_measure(available)
        })
    }

    pub fn set_header_width(&mut self, id: usize, width: f32) {
        if let Some(col) = self.columns.get_mut(id) {
            col.header_width = Some(if width.is_finite() { width.max(0.0) } else { 0.0 });
        }
    }

    /// Forget every natural width so auto columns can shrink again.
    pub fn clear_measurements(&mut self) {
        for col in &mut self.columns {
            col.natural_width = 0.0;
            col.header_width = None;
            col.cells_measured = false;
        }
    }

    // ------------------------------------------------------------------
    // Layout pass
    // ------------------------------------------------------------------

    /// Two-pass star sizing against `available` width.
    ///
    /// Fixed and auto columns resolve first; proportional columns then share
    /// what is left by weight. In unconstrained space proportional columns
    /// resolve as auto. `measure(column, max)` returns the natural width
    /// of an auto column.
    pub fn layout<F>(&mut self, available: f32, mut measure: F) -> ColumnPass
    where
        F: FnMut(&Column, f32) -> f32,
    {
        let mut used_width = 0.0;
        let mut star_weight = 0.0;
        let mut resolved: Vec<(usize, f32)> = Vec::with_capacity(self.columns.len());
        let mut deferred: Vec<StarItem> = Vec::new();

        for &id in &self.display_order {
            let Some(col) = self.columns.get(id) else {
                continue;
            };
            if !col.def.visible {
                resolved.push((id, 0.0));
                continue;
            }
            match col
                .def
                .size
                .resolve(available, col.def.bounds, |max| measure(col, max))
            {
                Resolution::Resolved(width) => {
                    used_width += width;
                    resolved.push((id, width));
                }
                Resolution::Deferred(weight) => {
                    star_weight += weight;
                    deferred.push(StarItem {
                        id,
                        weight,
                        bounds: col.def.bounds,
                        width: 0.0,
                    });
                }
            }
        }

        if !deferred.is_empty() {
            distribute_stars(available - used_width, &mut deferred);
            resolved.extend(deferred.iter().map(|item| (item.id, item.width)));
        }

        for (id, width) in resolved {
            if let Some(col) = self.columns.get_mut(id) {
                col.actual_width = width;
            }
        }
        self.rebuild_positions();

        let pass = ColumnPass {
            used_width,
            star_weight,
            total_width: self.total_width(),
            frozen_width: self.frozen_width(),
        };
        debug!(
            target: "gridport::columns",
            available,
            used = pass.used_width,
            star_weight = pass.star_weight,
            total = pass.total_width,
            frozen = pass.frozen_width,
            "column layout pass"
        );
        pass
    }

    fn rebuild_positions(&mut self) {
        self.positions.clear();
        self.positions.reserve(self.display_order.len() + 1);
        let mut x: f32 = 0.0;
        for &id in &self.display_order {
            self.positions.push(x);
            x += self.columns.get(id).map_or(0.0, |c| {
                if c.def.visible {
                    c.actual_width
                } else {
                    0.0
                }
            });
        }
        self.positions.push(x);
    }

    // ------------------------------------------------------------------
    // Geometry over display order
    // ------------------------------------------------------------------

    /// Sum of every visible column's width.
    pub fn total_width(&self) -> f32 {
        self.positions.last().copied().unwrap_or(0.0)
    }

    /// Width of the frozen prefix.
    pub fn frozen_width(&self) -> f32 {
        if self.frozen_count == 0 {
            return 0.0;
        }
        self.positions
            .get(self.frozen_count)
            .copied()
            .unwrap_or(0.0)
    }

    /// Width of the horizontally scrolling part.
    pub fn scrolling_width(&self) -> f32 {
        (self.total_width() - self.frozen_width()).max(0.0)
    }

    /// Left edge of a display position, in content coordinates.
    pub fn left_of(&self, pos: usize) -> f32 {
        self.positions.get(pos).copied().unwrap_or(0.0)
    }

    /// Rendered width at a display position (0 for hidden columns).
    pub fn width_at(&self, pos: usize) -> f32 {
        match (self.positions.get(pos), self.positions.get(pos + 1)) {
            (Some(left), Some(right)) => right - left,
            _ => 0.0,
        }
    }

    /// Left edge of a scrolling display position relative to the start of
    /// the scrolling region.
    pub fn scrolling_left(&self, pos: usize) -> f32 {
        self.left_of(pos) - self.frozen_width()
    }

    fn is_displayable(&self, pos: usize) -> bool {
        self.column_at(pos).is_some_and(|c| c.def.visible)
    }

    /// First visible scrolling display position.
    pub fn first_scrolling(&self) -> Option<usize> {
        (self.frozen_count..self.display_order.len()).find(|&p| self.is_displayable(p))
    }

    /// Last visible scrolling display position.
    pub fn last_scrolling(&self) -> Option<usize> {
        (self.frozen_count..self.display_order.len())
            .rev()
            .find(|&p| self.is_displayable(p))
    }

    /// Next visible scrolling position after `pos`.
    pub fn next_scrolling(&self, pos: usize) -> Option<usize> {
        (pos + 1..self.display_order.len()).find(|&p| p >= self.frozen_count && self.is_displayable(p))
    }

    /// Previous visible scrolling position before `pos`.
    pub fn prev_scrolling(&self, pos: usize) -> Option<usize> {
        (self.frozen_count..pos.min(self.display_order.len()))
            .rev()
            .find(|&p| self.is_displayable(p))
    }

    /// Visible frozen display positions, in order.
    pub fn frozen_positions(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.frozen_count.min(self.display_order.len())).filter(move |&p| self.is_displayable(p))
    }
}

/// Share `remaining` width among proportional columns by weight.
///
/// Shares are clamped to each column's bounds. Columns whose share had to be
/// clamped are frozen at that bound and the rest re-share what is left, so
/// the final widths respect every min/max and still add up to `remaining`
/// whenever the bounds allow it.
fn distribute_stars(remaining: f32, items: &mut [StarItem]) {
    let mut space = remaining.max(0.0);
    let mut open: Vec<usize> = (0..items.len()).collect();

    while !open.is_empty() {
        let weight: f32 = open
            .iter()
            .filter_map(|&i| items.get(i))
            .map(|it| it.weight)
            .sum();
        let per_star = if weight > 0.0 {
            (space / weight).max(0.0)
        } else {
            0.0
        };

        let mut violation = 0.0;
        for &i in &open {
            if let Some(item) = items.get_mut(i) {
                let target = per_star * item.weight;
                item.width = item.bounds.clamp(target);
                violation += item.width - target;
            }
        }
        if violation.abs() <= STAR_EPSILON {
            break;
        }

        // Positive violation: mins pushed columns wider, freeze those.
        // Negative: maxes capped columns, freeze those instead.
        let before = open.len();
        open.retain(|&i| {
            let Some(item) = items.get(i) else {
                return false;
            };
            let target = per_star * item.weight;
            let clamped = if violation > 0.0 {
                item.width > target
            } else {
                item.width < target
            };
            if clamped {
                space = (space - item.width).max(0.0);
            }
            !clamped
        });
        if open.len() == before {
            break;
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn natural(widths: &'static [f32]) -> impl FnMut(&Column, f32) -> f32 {
        move |col, _| widths.get(col.id()).copied().unwrap_or(0.0)
    }

    #[test]
    fn star_weights_split_remaining_exactly() {
        let mut set = ColumnSet::from_defs(&[ColumnDef::star(1.0), ColumnDef::star(3.0)]).unwrap();
        let pass = set.layout(400.0, natural(&[]));
        assert_eq!(set.get(0).unwrap().actual_width(), 100.0);
        assert_eq!(set.get(1).unwrap().actual_width(), 300.0);
        assert_eq!(pass.star_weight, 4.0);
        assert_eq!(pass.total_width, 400.0);
    }

    #[test]
    fn fixed_auto_star_mix() {
        let mut set = ColumnSet::from_defs(&[
            ColumnDef::fixed(50.0),
            ColumnDef::auto(),
            ColumnDef::star(1.0),
        ])
        .unwrap();
        let pass = set.layout(300.0, natural(&[0.0, 80.0, 0.0]));
        assert_eq!(set.get(1).unwrap().actual_width(), 80.0);
        assert_eq!(set.get(2).unwrap().actual_width(), 170.0);
        assert_eq!(pass.used_width, 130.0);
        assert_eq!(set.total_width(), 300.0);
    }

    #[test]
    fn star_degrades_to_auto_without_finite_width() {
        let mut set = ColumnSet::from_defs(&[ColumnDef::star(1.0), ColumnDef::star(2.0)]).unwrap();
        let pass = set.layout(f32::INFINITY, natural(&[60.0, 90.0]));
        assert_eq!(pass.star_weight, 0.0);
        assert_eq!(set.get(0).unwrap().actual_width(), 60.0);
        assert_eq!(set.get(1).unwrap().actual_width(), 90.0);
    }

    #[test]
    fn star_clamped_to_min_and_rest_redistributed() {
        let narrow = ColumnDef::star(1.0).with_bounds(150.0, f32::INFINITY).unwrap();
        let mut set = ColumnSet::from_defs(&[narrow, ColumnDef::star(3.0)]).unwrap();
        set.layout(400.0, natural(&[]));
        assert_eq!(set.get(0).unwrap().actual_width(), 150.0);
        assert_eq!(set.get(1).unwrap().actual_width(), 250.0);
    }

    #[test]
    fn star_clamped_to_max_and_rest_redistributed() {
        let capped = ColumnDef::star(3.0).with_bounds(0.0, 200.0).unwrap();
        let mut set = ColumnSet::from_defs(&[ColumnDef::star(1.0), capped]).unwrap();
        set.layout(400.0, natural(&[]));
        assert_eq!(set.get(1).unwrap().actual_width(), 200.0);
        assert_eq!(set.get(0).unwrap().actual_width(), 200.0);
    }

    #[test]
    fn no_remaining_space_gives_star_minimum() {
        let mut set = ColumnSet::from_defs(&[ColumnDef::fixed(500.0), ColumnDef::star(1.0)]).unwrap();
        set.layout(300.0, natural(&[]));
        assert_eq!(set.get(1).unwrap().actual_width(), MIN_COL_WIDTH);
    }

    #[test]
    fn hidden_columns_take_no_width() {
        let mut set = ColumnSet::from_defs(&[
            ColumnDef::fixed(50.0),
            ColumnDef::fixed(70.0).hidden(),
            ColumnDef::star(1.0),
        ])
        .unwrap();
        set.layout(200.0, natural(&[]));
        assert_eq!(set.width_at(1), 0.0);
        assert_eq!(set.get(2).unwrap().actual_width(), 150.0);
        assert_eq!(set.total_width(), 200.0);
    }

    #[test]
    fn frozen_width_tracks_prefix() {
        let mut set = ColumnSet::from_defs(&[ColumnDef::fixed(40.0), ColumnDef::fixed(60.0), ColumnDef::fixed(80.0)])
            .unwrap();
        set.set_frozen_count(2).unwrap();
        set.layout(1000.0, natural(&[]));
        assert_eq!(set.frozen_width(), 100.0);
        assert_eq!(set.scrolling_width(), 80.0);
        assert!(set.is_frozen(1));
        assert!(!set.is_frozen(2));
        assert_eq!(set.first_scrolling(), Some(2));
    }

    #[test]
    fn move_across_frozen_boundary_keeps_count() {
        let mut set = ColumnSet::from_defs(&[ColumnDef::fixed(10.0), ColumnDef::fixed(20.0), ColumnDef::fixed(30.0)])
            .unwrap();
        set.set_frozen_count(1).unwrap();
        set.move_to(2, 0).unwrap();
        assert_eq!(set.display_order(), &[2, 0, 1]);
        assert_eq!(set.frozen_count(), 1);
        assert!(set.is_frozen(2));
        assert!(!set.is_frozen(0));
        assert_eq!(set.get(0).unwrap().display_index(), 1);
    }

    #[test]
    fn insert_and_remove_shift_identities() {
        let mut set = ColumnSet::from_defs(&[ColumnDef::fixed(10.0), ColumnDef::fixed(20.0)]).unwrap();
        set.set_frozen_count(1).unwrap();
        set.insert(0, ColumnDef::fixed(5.0)).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.frozen_count(), 2);
        assert_eq!(set.display_order(), &[0, 1, 2]);

        let removed = set.remove(1).unwrap();
        assert_eq!(removed.size(), SizeSpec::Fixed(10.0));
        assert_eq!(set.frozen_count(), 1);
        assert_eq!(set.display_order(), &[0, 1]);
        assert!(set.remove(9).is_err());
    }

    #[test]
    fn auto_natural_width_only_grows() {
        let mut set = ColumnSet::from_defs(&[ColumnDef::auto()]).unwrap();
        set.note_natural_width(0, 90.0);
        set.note_natural_width(0, 40.0);
        set.set_header_width(0, 30.0);
        assert_eq!(set.get(0).unwrap().natural_width(), 90.0);
        set.clear_measurements();
        assert_eq!(set.get(0).unwrap().natural_width(), 0.0);
    }

    #[test]
    fn pending_measure_tracks_new_and_reshown_columns() {
        let mut set = ColumnSet::from_defs(&[ColumnDef::auto(), ColumnDef::fixed(50.0), ColumnDef::auto().hidden()])
            .unwrap();
        assert_eq!(set.pending_measure(300.0), vec![0]);
        set.mark_cells_measured(&[0]);
        assert!(set.pending_measure(300.0).is_empty());

        set.insert(1, ColumnDef::auto()).unwrap();
        assert_eq!(set.pending_measure(300.0), vec![1]);
        set.mark_cells_measured(&[1]);

        set.set_visible(3, true).unwrap();
        assert_eq!(set.pending_measure(300.0), vec![3]);
        set.mark_cells_measured(&[3]);

        set.clear_measurements();
        assert_eq!(set.pending_measure(300.0), vec![0, 1, 3]);
    }

    #[test]
    fn invalid_spec_rejected() {
        let mut set = ColumnSet::new();
        assert!(set.push(ColumnDef::star(0.0)).is_err());
        assert!(set.push(ColumnDef::fixed(f32::NAN)).is_err());
        assert!(set.is_empty());
    }
}
