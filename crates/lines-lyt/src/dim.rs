//! Per-node sizing intent and layout outcome
//!
//! A [`Dim`] is owned by its component. The component states how it wants
//! to be sized (fixed or filling in each axis); a reflow writes back where
//! the node landed on screen, how much of it was clipped, and which margins
//! were put around it.
//!
//! # Lifecycle
//!
//! - Construct with [`Dim::fixed`], [`Dim::filling_width`],
//!   [`Dim::filling_height`] or [`Dim::filling`].
//! - Between reflows call [`Dim::set_width`]/[`Dim::set_height`] (immediate,
//!   makes the axis fixed), [`Dim::set_filling`] (sets fill minima) or
//!   [`Dim::update_width`]/[`Dim::update_height`] (deferred to the next
//!   reflow).
//! - A reflow snapshots the printable area, applies pending updates, lays
//!   the node out, flags it dirty if its printable area moved, and finally
//!   cleans up the dirty and update state.

use crate::axis::Axis;
use crate::geometry::{Edges, Rect};

/// Requested sizes of [`Dim::update_width`]/[`Dim::update_height`]; zero
/// means nothing is pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Update {
    width: i32,
    height: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dim {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    fills_width: i32,
    fills_height: i32,
    clip_width: i32,
    clip_height: i32,
    mrg: Edges,
    update: Update,
    /// Fill minima of axes that were filling when a pending update got
    /// applied; they mark the axis for re-entering filling after the pass.
    stash: Update,
    /// Printable area at the start of the running reflow.
    prev: Rect,
    dirty: bool,
    settled: bool,
}

impl Dim {
    /// A node of fixed size in both axes.
    ///
    /// # Panics
    ///
    /// If `width` or `height` is not positive.
    pub fn fixed(width: i32, height: i32) -> Self {
        assert!(
            width > 0 && height > 0,
            "fixed dim needs positive size, got {width}x{height}"
        );
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// A node filling horizontally with at least `fills_width` columns
    /// and a fixed `height`.
    ///
    /// # Panics
    ///
    /// If an argument is not positive.
    pub fn filling_width(fills_width: i32, height: i32) -> Self {
        assert!(
            fills_width > 0 && height > 0,
            "width filling dim needs positive arguments, got {fills_width}x{height}"
        );
        Self {
            width: fills_width,
            height,
            fills_width,
            ..Self::default()
        }
    }

    /// A node of fixed `width` filling vertically with at least
    /// `fills_height` rows.
    ///
    /// # Panics
    ///
    /// If an argument is not positive.
    pub fn filling_height(width: i32, fills_height: i32) -> Self {
        assert!(
            width > 0 && fills_height > 0,
            "height filling dim needs positive arguments, got {width}x{fills_height}"
        );
        Self {
            width,
            height: fills_height,
            fills_height,
            ..Self::default()
        }
    }

    /// A node filling in both axes with the given minima.
    ///
    /// # Panics
    ///
    /// If an argument is not positive.
    pub fn filling(fills_width: i32, fills_height: i32) -> Self {
        assert!(
            fills_width > 0 && fills_height > 0,
            "filling dim needs positive minima, got {fills_width}x{fills_height}"
        );
        Self {
            width: fills_width,
            height: fills_height,
            fills_width,
            fills_height,
            ..Self::default()
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn fills_width(&self) -> i32 {
        self.fills_width
    }

    pub fn fills_height(&self) -> i32 {
        self.fills_height
    }

    pub fn is_filling_width(&self) -> bool {
        self.fills_width > 0
    }

    pub fn is_filling_height(&self) -> bool {
        self.fills_height > 0
    }

    /// Clipped width and height.
    pub fn clip(&self) -> (i32, i32) {
        (self.clip_width, self.clip_height)
    }

    pub fn margin(&self) -> Edges {
        self.mrg
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// A size update is pending until the next reflow completes.
    pub fn is_updated(&self) -> bool {
        self.update.width > 0 || self.update.height > 0
    }

    pub fn is_off_screen(&self) -> bool {
        self.clip_width == self.width && self.clip_height == self.height
    }

    /// The content area: margins removed, clipping applied.
    pub fn printable(&self) -> Rect {
        if self.is_off_screen() {
            return Rect::ZERO;
        }
        Rect::new(
            self.x.saturating_add(self.mrg.left),
            self.y.saturating_add(self.mrg.top),
            self.width - self.clip_width,
            self.height - self.clip_height,
        )
    }

    /// The area the node takes in its container, margins included.
    pub fn screen(&self) -> Rect {
        if self.is_off_screen() {
            return Rect::ZERO;
        }
        Rect::new(
            self.x,
            self.y,
            (self.width - self.clip_width).saturating_add(self.mrg.horizontal()),
            (self.height - self.clip_height).saturating_add(self.mrg.vertical()),
        )
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.screen().contains(x, y)
    }

    pub fn printable_contains(&self, x: i32, y: i32) -> bool {
        self.printable().contains(x, y)
    }

    /// Fixes the width; a filling width stops filling. Non-positive
    /// widths are ignored.
    pub fn set_width(&mut self, width: i32) {
        if width <= 0 {
            return;
        }
        self.width = width;
        self.fills_width = 0;
        self.update.width = 0;
        self.dirty = true;
    }

    /// Fixes the height; a filling height stops filling. Non-positive
    /// heights are ignored.
    pub fn set_height(&mut self, height: i32) {
        if height <= 0 {
            return;
        }
        self.height = height;
        self.fills_height = 0;
        self.update.height = 0;
        self.dirty = true;
    }

    /// Sets the fill minima; an axis given a non-positive minimum keeps
    /// its current sizing.
    pub fn set_filling(&mut self, fills_width: i32, fills_height: i32) {
        if fills_width > 0 {
            self.fills_width = fills_width;
            if self.width <= 0 {
                self.width = fills_width;
            }
            self.dirty = true;
        }
        if fills_height > 0 {
            self.fills_height = fills_height;
            if self.height <= 0 {
                self.height = fills_height;
            }
            self.dirty = true;
        }
    }

    /// Requests the width to change by `delta` at the next reflow.
    ///
    /// A filling width behaves as fixed for that one reflow and fills again
    /// afterwards with the new width as its minimum.
    pub fn update_width(&mut self, delta: i32) {
        if delta == 0 {
            return;
        }
        let current = if self.update.width > 0 {
            self.update.width
        } else {
            self.width
        };
        match current.checked_add(delta) {
            Some(size) if size > 0 => self.update.width = size,
            _ => {}
        }
    }

    /// Requests the height to change by `delta` at the next reflow; see
    /// [`Dim::update_width`].
    pub fn update_height(&mut self, delta: i32) {
        if delta == 0 {
            return;
        }
        let current = if self.update.height > 0 {
            self.update.height
        } else {
            self.height
        };
        match current.checked_add(delta) {
            Some(size) if size > 0 => self.update.height = size,
            _ => {}
        }
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.settled
    }

    /// Sizing is usable in `axis`: a positive size or fill minimum.
    pub(crate) fn is_dimensioned(&self, axis: Axis) -> bool {
        self.size(axis) > 0 || self.fills(axis) > 0
    }

    pub(crate) fn size(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    pub(crate) fn fills(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.fills_width,
            Axis::Vertical => self.fills_height,
        }
    }

    pub(crate) fn clip_in(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.clip_width,
            Axis::Vertical => self.clip_height,
        }
    }

    /// Margins before and after the node in `axis`.
    pub(crate) fn margins_in(&self, axis: Axis) -> (i32, i32) {
        match axis {
            Axis::Horizontal => (self.mrg.left, self.mrg.right),
            Axis::Vertical => (self.mrg.top, self.mrg.bottom),
        }
    }

    /// The extent the node takes in its container along `axis`.
    pub(crate) fn laid_out(&self, axis: Axis) -> i32 {
        let clip = self.clip_in(axis);
        if clip > 0 {
            return self.size(axis) - clip;
        }
        let (before, after) = self.margins_in(axis);
        self.size(axis).saturating_add(before).saturating_add(after)
    }

    pub(crate) fn axis_mut(&mut self, axis: Axis) -> AxisMut<'_> {
        let Dim {
            x,
            y,
            width,
            height,
            fills_width,
            fills_height,
            clip_width,
            clip_height,
            mrg,
            ..
        } = self;
        match axis {
            Axis::Horizontal => AxisMut {
                origin: x,
                size: width,
                fills: fills_width,
                clip: clip_width,
                before: &mut mrg.left,
                after: &mut mrg.right,
            },
            Axis::Vertical => AxisMut {
                origin: y,
                size: height,
                fills: fills_height,
                clip: clip_height,
                before: &mut mrg.top,
                after: &mut mrg.bottom,
            },
        }
    }

    /// Clips the node completely and drops its margins.
    pub(crate) fn set_off_screen(&mut self) {
        self.clip_width = self.width;
        self.clip_height = self.height;
        self.mrg = Edges::default();
    }

    /// Snapshots the printable area and applies pending updates.
    pub(crate) fn prepare_layout(&mut self) {
        self.prev = self.printable();
        if self.update.width > 0 {
            if self.fills_width > 0 {
                self.stash.width = self.fills_width;
                self.fills_width = 0;
            }
            self.width = self.update.width;
        }
        if self.update.height > 0 {
            if self.fills_height > 0 {
                self.stash.height = self.fills_height;
                self.fills_height = 0;
            }
            self.height = self.update.height;
        }
    }

    /// Flags the node dirty if its printable area changed during the pass;
    /// reports whether it is dirty.
    pub(crate) fn finalize_layout(&mut self) -> bool {
        if self.printable() != self.prev {
            self.dirty = true;
        }
        self.dirty
    }

    /// Clears dirty and update state; an axis that was filling before its
    /// update fills again with the updated size as minimum. An axis the
    /// pass centered with margins stays fixed at the updated size, since a
    /// filling axis never carries margins.
    pub(crate) fn clean_up(&mut self) {
        self.dirty = false;
        self.settled = true;
        if self.update.width > 0 {
            if self.stash.width > 0 && self.margins_in(Axis::Horizontal) == (0, 0) {
                self.fills_width = self.width.max(1);
            }
            self.update.width = 0;
            self.stash.width = 0;
        }
        if self.update.height > 0 {
            if self.stash.height > 0 && self.margins_in(Axis::Vertical) == (0, 0) {
                self.fills_height = self.height.max(1);
            }
            self.update.height = 0;
            self.stash.height = 0;
        }
    }
}

/// Mutable view of one axis of a [`Dim`].
pub(crate) struct AxisMut<'a> {
    pub origin: &'a mut i32,
    pub size: &'a mut i32,
    pub fills: &'a mut i32,
    pub clip: &'a mut i32,
    pub before: &'a mut i32,
    pub after: &'a mut i32,
}

impl AxisMut<'_> {
    /// Places the node at `size` without clip or margins.
    pub fn set_exact(&mut self, size: i32) {
        *self.size = size;
        *self.clip = 0;
        *self.before = 0;
        *self.after = 0;
    }

    pub fn set_clipped(&mut self, size: i32, clip: i32) {
        *self.size = size;
        *self.clip = clip;
        *self.before = 0;
        *self.after = 0;
    }

    pub fn set_margins(&mut self, before: i32, after: i32) {
        *self.clip = 0;
        *self.before = before;
        *self.after = after;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "fixed dim needs positive size")]
    fn fixed_rejects_zero_width() {
        let _ = Dim::fixed(0, 5);
    }

    #[test]
    #[should_panic(expected = "width filling dim needs positive arguments")]
    fn filling_width_rejects_negative_height() {
        let _ = Dim::filling_width(3, -1);
    }

    #[test]
    #[should_panic(expected = "height filling dim needs positive arguments")]
    fn filling_height_rejects_zero_fill() {
        let _ = Dim::filling_height(3, 0);
    }

    #[test]
    #[should_panic(expected = "filling dim needs positive minima")]
    fn filling_rejects_zero_minima() {
        let _ = Dim::filling(0, 0);
    }

    #[test]
    fn constructors_classify_axes() {
        let d = Dim::filling_width(10, 3);
        assert!(d.is_filling_width());
        assert!(!d.is_filling_height());
        assert_eq!((d.width(), d.height()), (10, 3));

        let d = Dim::filling_height(4, 2);
        assert!(!d.is_filling_width());
        assert!(d.is_filling_height());

        let d = Dim::filling(1, 1);
        assert!(d.is_filling_width() && d.is_filling_height());
    }

    #[test]
    fn set_width_makes_axis_fixed_and_dirty() {
        let mut d = Dim::filling(5, 5);
        d.set_width(12);
        assert!(!d.is_filling_width());
        assert_eq!(d.width(), 12);
        assert!(d.is_dirty());
    }

    #[test]
    fn non_positive_set_width_is_ignored() {
        let mut d = Dim::fixed(4, 4);
        d.set_width(0);
        assert_eq!(d.width(), 4);
        assert!(!d.is_dirty());
    }

    #[test]
    fn set_filling_keeps_untouched_axis() {
        let mut d = Dim::fixed(4, 4);
        d.set_filling(2, 0);
        assert_eq!(d.fills_width(), 2);
        assert!(!d.is_filling_height());
        assert!(d.is_dirty());
    }

    #[test]
    fn update_zero_delta_is_noop() {
        let mut d = Dim::fixed(4, 4);
        d.update_width(0);
        assert!(!d.is_updated());
    }

    #[test]
    fn update_to_non_positive_size_is_ignored() {
        let mut d = Dim::fixed(4, 4);
        d.update_height(-4);
        assert!(!d.is_updated());
        d.update_height(-3);
        assert!(d.is_updated());
    }

    #[test]
    fn updates_accumulate_until_reflow() {
        let mut d = Dim::fixed(4, 4);
        d.update_width(2);
        d.update_width(3);
        d.prepare_layout();
        assert_eq!(d.width(), 9);
    }

    #[test]
    fn filling_axis_update_is_fixed_for_one_pass() {
        let mut d = Dim::filling(1, 1);
        d.axis_mut(Axis::Vertical).set_exact(8);
        d.update_height(2);

        d.prepare_layout();
        assert!(!d.is_filling_height());
        assert_eq!(d.height(), 10);
        assert!(d.is_updated());

        d.finalize_layout();
        d.clean_up();
        assert!(!d.is_updated());
        assert_eq!(d.fills_height(), 10);
    }

    #[test]
    fn centered_filling_update_stays_fixed() {
        let mut d = Dim::filling(1, 1);
        d.axis_mut(Axis::Vertical).set_exact(25);
        d.update_height(-5);

        d.prepare_layout();
        d.axis_mut(Axis::Vertical).set_margins(2, 3);
        d.finalize_layout();
        d.clean_up();
        assert_eq!(d.height(), 20);
        assert!(!d.is_filling_height());
        assert!(d.is_filling_width());
    }

    #[test]
    fn update_overflowing_i32_is_ignored() {
        let mut d = Dim::fixed(i32::MAX, 5);
        d.update_width(1);
        assert!(!d.is_updated());
    }

    #[test]
    fn fixed_axis_update_stays_fixed() {
        let mut d = Dim::fixed(5, 5);
        d.update_width(3);
        d.prepare_layout();
        d.finalize_layout();
        d.clean_up();
        assert_eq!(d.width(), 8);
        assert!(!d.is_filling_width());
    }

    #[test]
    fn printable_and_screen_account_for_margins() {
        let mut d = Dim::fixed(40, 15);
        d.axis_mut(Axis::Horizontal).set_margins(20, 20);
        d.axis_mut(Axis::Vertical).set_margins(5, 5);

        assert_eq!(d.printable(), Rect::new(20, 5, 40, 15));
        assert_eq!(d.screen(), Rect::new(0, 0, 80, 25));
        assert!(d.contains(0, 0));
        assert!(!d.printable_contains(0, 0));
        assert!(d.printable_contains(20, 5));
    }

    #[test]
    fn clipped_node_prints_remaining_area() {
        let mut d = Dim::fixed(61, 8);
        d.axis_mut(Axis::Horizontal).set_clipped(61, 42);
        assert_eq!(d.printable(), Rect::new(0, 0, 19, 8));
        assert_eq!(d.laid_out(Axis::Horizontal), 19);
    }

    #[test]
    fn off_screen_node_has_no_area() {
        let mut d = Dim::fixed(10, 10);
        d.axis_mut(Axis::Horizontal).set_margins(3, 3);
        d.set_off_screen();
        assert!(d.is_off_screen());
        assert_eq!(d.printable(), Rect::ZERO);
        assert_eq!(d.screen(), Rect::ZERO);
        assert_eq!(d.margin(), Edges::default());
        assert_eq!(d.laid_out(Axis::Horizontal), 0);
    }

    #[test]
    fn finalize_flags_moved_printable() {
        let mut d = Dim::fixed(10, 10);
        d.prepare_layout();
        assert!(!d.finalize_layout());

        d.prepare_layout();
        *d.axis_mut(Axis::Horizontal).origin = 3;
        assert!(d.finalize_layout());
        d.clean_up();
        assert!(!d.is_dirty());
    }
}
