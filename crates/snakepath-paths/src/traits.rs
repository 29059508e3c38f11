use snakepath_core::{Point, Range};

/// The view of a grid that the searches need: its bounds and which cells
/// can be entered.
pub trait Pather {
    /// The rectangle of valid cells.
    fn bounds(&self) -> Range;

    /// Whether `p` may be entered. Only called for points inside
    /// [`bounds`](Pather::bounds).
    fn passable(&self, p: Point) -> bool;
}

impl<P: Pather + ?Sized> Pather for &P {
    fn bounds(&self) -> Range {
        (**self).bounds()
    }

    fn passable(&self, p: Point) -> bool {
        (**self).passable(p)
    }
}
