//! Which heading the "On this page" table of contents highlights.
//!
//! The tracker is a plain state machine fed with discrete events, so it can be driven by a browser, a test or
//! anything else that can report scroll geometry. After a click-driven navigation it holds the clicked id for a
//! short while (the manual override) so that the scroll animation doesn't immediately move the highlight elsewhere.
use std::time::{Duration, Instant};

use crate::content::Heading;

/// Distance from the top of the viewport at which a heading counts as "being read".
pub const ACTIVATION_LINE: f64 = 150.0;
/// Headings further down than this are never picked.
pub const ACTIVATION_LIMIT: f64 = 200.0;
/// How close to the end of the document counts as the bottom.
pub const BOTTOM_TOLERANCE: f64 = 50.0;
/// How close to the start of the document counts as the top.
pub const TOP_TOLERANCE: f64 = 40.0;

pub const NAVIGATION_OVERRIDE: Duration = Duration::from_millis(700);
/// Override after a click in the TOC panel.
pub const TOC_NAVIGATION_OVERRIDE: Duration = Duration::from_millis(1000);
pub const SETTLE_OVERRIDE: Duration = Duration::from_millis(400);

/// Where a heading currently sits on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingPosition {
    pub id: String,
    /// Top edge relative to the viewport, `None` when the heading isn't rendered.
    pub top: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollGeometry {
    pub scroll_y: f64,
    pub viewport_height: f64,
    pub document_height: f64,
    /// Every heading of the page, in document order.
    pub headings: Vec<HeadingPosition>,
}

impl ScrollGeometry {
    pub fn is_at_bottom(&self) -> bool {
        self.viewport_height + self.scroll_y >= self.document_height - BOTTOM_TOLERANCE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollSource {
    /// Wheel, touch, keyboard, scrollbar.
    User,
    /// Scrolling started by the page itself, e.g. the smooth scroll after a TOC click.
    Programmatic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ManualOverride {
    expires_at: Instant,
    clear_on_scroll: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ActiveSectionTracker {
    active_id: Option<String>,
    manual: Option<ManualOverride>,
}

impl ActiveSectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn is_overridden(&self) -> bool {
        self.manual.is_some()
    }

    /// Recompute the active heading after a scroll.
    ///
    /// A user scroll ends an override started by [`on_manual_navigate`](Self::on_manual_navigate). While an override
    /// is active the highlight doesn't move. Otherwise the last heading wins at the bottom of the page, and elsewhere
    /// the heading closest to [`ACTIVATION_LINE`] among those not below [`ACTIVATION_LIMIT`]. With no candidate the
    /// previous heading stays active.
    pub fn on_scroll(
        &mut self,
        geometry: &ScrollGeometry,
        source: ScrollSource,
        now: Instant,
    ) -> Option<&str> {
        self.on_override_expire(now);

        if source == ScrollSource::User
            && self
                .manual
                .as_ref()
                .is_some_and(|manual| manual.clear_on_scroll)
        {
            self.manual = None;
        }

        if self.manual.is_none()
            && let Some(id) = select_active(geometry)
        {
            self.active_id = Some(id.to_string());
        }

        self.active_id()
    }

    /// The reader jumped to `id` through an in-page anchor.
    ///
    /// Any previous override is replaced.
    pub fn on_manual_navigate(&mut self, id: &str, now: Instant) {
        self.hold(id, now + NAVIGATION_OVERRIDE);
    }

    /// Same as [`on_manual_navigate`](Self::on_manual_navigate), for a link in the TOC panel.
    pub fn on_toc_navigate(&mut self, id: &str, now: Instant) {
        self.hold(id, now + TOC_NAVIGATION_OVERRIDE);
    }

    fn hold(&mut self, id: &str, expires_at: Instant) {
        self.active_id = Some(id.to_string());
        self.manual = Some(ManualOverride {
            expires_at,
            clear_on_scroll: true,
        });
    }

    /// Drop the override once its deadline has passed. Returns whether it was dropped.
    pub fn on_override_expire(&mut self, now: Instant) -> bool {
        match &self.manual {
            Some(manual) if now >= manual.expires_at => {
                self.manual = None;
                true
            }
            _ => false,
        }
    }

    /// Called once the page has rendered.
    ///
    /// If nothing is highlighted yet and the reader is at the top of the page, the first level-2 heading becomes
    /// active, held briefly so the first scroll events don't replace it.
    pub fn on_settle(&mut self, headings: &[Heading], scroll_y: f64, now: Instant) -> Option<&str> {
        if self.active_id.is_some() || self.manual.is_some() || scroll_y > TOP_TOLERANCE {
            return self.active_id();
        }

        if let Some(first) = headings.iter().find(|heading| heading.level == 2) {
            self.active_id = Some(first.id.clone());
            self.manual = Some(ManualOverride {
                expires_at: now + SETTLE_OVERRIDE,
                clear_on_scroll: false,
            });
        }

        self.active_id()
    }
}

fn select_active(geometry: &ScrollGeometry) -> Option<&str> {
    if geometry.is_at_bottom()
        && let Some(last) = geometry.headings.last()
    {
        return Some(&last.id);
    }

    let mut closest: Option<(&str, f64)> = None;
    for heading in &geometry.headings {
        let Some(top) = heading.top else {
            continue;
        };
        if top > ACTIVATION_LIMIT {
            continue;
        }

        let distance = (top - ACTIVATION_LINE).abs();
        if closest.is_none_or(|(_, best)| distance < best) {
            closest = Some((&heading.id, distance));
        }
    }

    closest.map(|(id, _)| id)
}
