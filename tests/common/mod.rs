#![allow(dead_code)]

use braillepad::translate::Cell;

pub const A: Cell = 0b000001;
pub const B: Cell = 0b000011;
pub const C: Cell = 0b001001;
pub const D: Cell = 0b011001;
pub const E: Cell = 0b010001;
pub const UNKNOWN: Cell = 0b000010;

pub fn glyph(cell: Cell) -> Option<&'static str> {
    match cell {
        0 => Some(" "),
        A => Some("a"),
        B => Some("b"),
        C => Some("c"),
        D => Some("d"),
        E => Some("e"),
        _ => None,
    }
}

/// Five letters; any other cell makes the whole buffer untranslatable.
pub fn letters(cells: &[Cell]) -> Option<String> {
    cells.iter().map(|&c| glyph(c)).collect()
}
