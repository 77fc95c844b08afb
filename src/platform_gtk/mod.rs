//! GTK4 host glue: feeds `DrawingArea` sizes into an [`ElementBounding`].

use gtk4 as gtk;
use gtk::glib::SignalHandlerId;
use gtk::prelude::*;

use crate::core::Size;
use crate::reactive::{BoundingBox, ElementBounding};

impl BoundingBox for gtk::DrawingArea {
    fn bounding_size(&self) -> Size {
        Size::new(f64::from(self.width()), f64::from(self.height()))
    }
}

/// Forwards every resize of `area` to `bounding`.
///
/// Disconnect the returned handler when the area outlives the binding.
pub fn observe_drawing_area(
    area: &gtk::DrawingArea,
    bounding: &ElementBounding,
) -> SignalHandlerId {
    let bounding = bounding.clone();
    area.connect_resize(move |_, width, height| {
        bounding.observe(Size::new(f64::from(width), f64::from(height)));
    })
}
