//! Single-axis layout shared by stackers and chainers
//!
//! A container hands its inner area and its children to [`layout`]. Along
//! the primary axis (height for stackers, width for chainers) the children
//! are distributed by one of four cases:
//!
//! - **off-screen**: the inner area is empty, every child is clipped away.
//! - **overflow**: the children's minimum extent exceeds the space; they are
//!   placed in order and whatever doesn't fit is clipped or off-screen.
//! - **fill**: there is room and some children fill; fillers absorb the
//!   excess, fixed children keep their size.
//! - **margins**: there is room and all children are fixed; the excess is
//!   spread as margins between and around them.
//!
//! Along the cross axis every child is [`fit`] to the container's size.

use crate::dim::AxisMut;
use crate::dimer::DimerRef;
use crate::error::{ContainerKind, DimError, Result};
use crate::geometry::Rect;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Origin and extent of `rect` along this axis.
    pub(crate) fn span(self, rect: Rect) -> (i32, i32) {
        match self {
            Self::Horizontal => (rect.x, rect.width),
            Self::Vertical => (rect.y, rect.height),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => f.write_str("width"),
            Self::Vertical => f.write_str("height"),
        }
    }
}

impl ContainerKind {
    /// The axis children are arranged along.
    pub fn axis(self) -> Axis {
        match self {
            Self::Stacker => Axis::Vertical,
            Self::Chainer => Axis::Horizontal,
        }
    }
}

/// How a container's children were distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Case {
    OffScreen,
    Overflow,
    Fill,
    Margins,
}

/// What a child asks for along the primary axis; `size` is the fill
/// minimum for fillers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Request {
    pub size: i32,
    pub filling: bool,
}

impl Request {
    pub fn fixed(size: i32) -> Self {
        Self {
            size,
            filling: false,
        }
    }

    pub fn filling(min: i32) -> Self {
        Self {
            size: min,
            filling: true,
        }
    }
}

/// A child's outcome along the primary axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Slot {
    pub size: i32,
    pub clip: i32,
    pub before: i32,
    pub after: i32,
    pub off_screen: bool,
}

impl Slot {
    fn exact(size: i32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    fn clipped(size: i32, clip: i32) -> Self {
        Self {
            size,
            clip,
            ..Self::default()
        }
    }

    fn off_screen(size: i32) -> Self {
        Self {
            size,
            clip: size,
            off_screen: true,
            ..Self::default()
        }
    }

    fn with_margins(size: i32, before: i32, after: i32) -> Self {
        Self {
            size,
            before,
            after,
            ..Self::default()
        }
    }

    /// Extent taken in the container.
    pub fn extent(&self) -> i32 {
        if self.clip > 0 {
            self.size - self.clip
        } else {
            self.size + self.before + self.after
        }
    }
}

/// Distributes `space` among `requests` along one axis.
pub(crate) fn distribute(requests: &[Request], space: i32) -> (Case, Vec<Slot>) {
    if space <= 0 {
        let slots = requests.iter().map(|r| Slot::off_screen(r.size)).collect();
        return (Case::OffScreen, slots);
    }
    let min: i64 = requests.iter().map(|r| i64::from(r.size)).sum();
    if min > i64::from(space) {
        return (Case::Overflow, overflow(requests, space));
    }
    if requests.iter().any(|r| r.filling) {
        return (Case::Fill, fill(requests, space));
    }
    // `min` fits: it is at most `space`
    (Case::Margins, margins(requests, space - min as i32))
}

fn overflow(requests: &[Request], space: i32) -> Vec<Slot> {
    let mut remaining = space;
    requests
        .iter()
        .map(|r| {
            if remaining <= 0 {
                Slot::off_screen(r.size)
            } else if r.size > remaining {
                let slot = Slot::clipped(r.size, r.size - remaining);
                remaining = 0;
                slot
            } else {
                remaining -= r.size;
                Slot::exact(r.size)
            }
        })
        .collect()
}

fn fill(requests: &[Request], space: i32) -> Vec<Slot> {
    let fixed: i32 = requests.iter().filter(|r| !r.filling).map(|r| r.size).sum();
    let minima: Vec<i32> = requests
        .iter()
        .filter(|r| r.filling)
        .map(|r| r.size)
        .collect();
    let mut shares = fill_shares(&minima, space - fixed).into_iter();
    requests
        .iter()
        .map(|r| {
            if r.filling {
                Slot::exact(shares.next().unwrap_or(r.size))
            } else {
                Slot::exact(r.size)
            }
        })
        .collect()
}

/// Splits `space` evenly among fillers with the given minima, handing the
/// remainder one unit each to the earliest fillers. A filler whose minimum
/// exceeds its share keeps the minimum and the rest is shared again.
///
/// `space` must cover the sum of `minima`.
pub(crate) fn fill_shares(minima: &[i32], space: i32) -> Vec<i32> {
    let mut shares = vec![0; minima.len()];
    let mut open: Vec<usize> = (0..minima.len()).collect();
    let mut space = space;
    while !open.is_empty() {
        let n = open.len() as i32;
        let share = space / n;
        let pinned: Vec<usize> = open
            .iter()
            .copied()
            .filter(|&i| minima[i] > share)
            .collect();
        if pinned.is_empty() {
            let remainder = space % n;
            for (k, &i) in open.iter().enumerate() {
                shares[i] = share + i32::from((k as i32) < remainder);
            }
            break;
        }
        for &i in &pinned {
            shares[i] = minima[i];
            space -= minima[i];
        }
        open.retain(|i| !pinned.contains(i));
    }
    shares
}

fn margins(requests: &[Request], excess: i32) -> Vec<Slot> {
    margin_split(requests.len(), excess)
        .into_iter()
        .zip(requests)
        .map(|((before, after), r)| Slot::with_margins(r.size, before, after))
        .collect()
}

/// Before/after margins for `n` fixed children sharing `excess` cells.
///
/// A single child is centered. Otherwise the excess is cut into `n + 1`
/// equal parts: the outer parts go before the first and after the last
/// child, each inner part is halved between its two neighbours, and the
/// remainder adds one cell to the trailing children's after margins.
pub(crate) fn margin_split(n: usize, excess: i32) -> Vec<(i32, i32)> {
    match n {
        0 => Vec::new(),
        1 => vec![(excess / 2, excess - excess / 2)],
        _ => {
            let parts = n as i32 + 1;
            let d = excess / parts;
            let half = d / 2;
            let mut split: Vec<(i32, i32)> = (0..n)
                .map(|i| match i {
                    0 => (d, half),
                    i if i == n - 1 => (d - half, d),
                    _ => (d - half, half),
                })
                .collect();
            let remainder = (excess % parts) as usize;
            for (_, after) in split.iter_mut().rev().take(remainder) {
                *after += 1;
            }
            split
        }
    }
}

/// Fits one axis of a node into `avail` cells: a filling axis stretches
/// (or clips if its minimum doesn't fit), a fixed axis is centered with
/// margins (or clipped).
pub(crate) fn fit(axis: &mut AxisMut<'_>, avail: i32) {
    let fills = *axis.fills;
    if fills > 0 {
        if fills <= avail {
            axis.set_exact(avail);
        } else {
            axis.set_clipped(fills, fills - avail);
        }
        return;
    }
    let size = *axis.size;
    if size <= avail {
        let delta = avail - size;
        axis.set_margins(delta / 2, delta - delta / 2);
    } else {
        axis.set_clipped(size, size - avail);
    }
}

/// Lays out `children` of a container of `kind` inside `inner`.
pub(crate) fn layout(kind: ContainerKind, inner: Rect, children: &[DimerRef]) -> Result<Case> {
    let primary = kind.axis();
    let cross = primary.cross();

    let mut requests = Vec::with_capacity(children.len());
    for (index, child) in children.iter().enumerate() {
        let dim = child.dim().borrow();
        for axis in [primary, cross] {
            if !dim.is_dimensioned(axis) {
                return Err(DimError {
                    container: kind,
                    index,
                    axis,
                }
                .into());
            }
        }
        let fills = dim.fills(primary);
        requests.push(if fills > 0 {
            Request::filling(fills)
        } else {
            Request::fixed(dim.size(primary))
        });
    }

    let (origin, space) = primary.span(inner);
    let (cross_origin, cross_space) = cross.span(inner);
    let space = if cross_space <= 0 { 0 } else { space };
    let (case, slots) = distribute(&requests, space);
    tracing::trace!(
        ?kind,
        ?case,
        children = children.len(),
        width = inner.width,
        height = inner.height,
        "layout container"
    );

    let mut cursor = origin;
    for (child, slot) in children.iter().zip(&slots) {
        let mut dim = child.dim().borrow_mut();
        *dim.axis_mut(cross).origin = cross_origin;
        {
            let along = dim.axis_mut(primary);
            *along.origin = cursor;
            *along.size = slot.size;
        }
        if slot.off_screen {
            dim.set_off_screen();
            continue;
        }
        {
            let mut along = dim.axis_mut(primary);
            if slot.clip > 0 {
                along.set_clipped(slot.size, slot.clip);
            } else {
                along.set_exact(slot.size);
                along.set_margins(slot.before, slot.after);
            }
        }
        fit(&mut dim.axis_mut(cross), cross_space);
        cursor = cursor.saturating_add(slot.extent());
    }
    Ok(case)
}
