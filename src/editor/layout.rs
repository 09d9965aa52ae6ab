use crate::config::LayoutConfig;
use crate::graph::{BranchLabel, Position};

/// Position of a step inserted after `origin`: one column further along the
/// primary axis, nudged up for "yes" branches and down for "no" branches.
pub fn place_after(
    origin: Position,
    branch_label: Option<BranchLabel>,
    layout: &LayoutConfig,
) -> Position {
    let dy = match branch_label {
        Some(BranchLabel::Yes) => -layout.branch_offset,
        Some(BranchLabel::No) => layout.branch_offset,
        None => 0.0,
    };
    origin.offset(layout.primary_offset, dy)
}

pub fn place_duplicate(original: Position, layout: &LayoutConfig) -> Position {
    original.offset(layout.duplicate_offset, layout.duplicate_offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_offsets() {
        let layout = LayoutConfig::default();
        let origin = Position::new(10.0, 20.0);
        assert_eq!(place_after(origin, None, &layout), Position::new(410.0, 20.0));
        assert_eq!(
            place_after(origin, Some(BranchLabel::Yes), &layout),
            Position::new(410.0, -130.0)
        );
        assert_eq!(
            place_after(origin, Some(BranchLabel::No), &layout),
            Position::new(410.0, 170.0)
        );
    }
}
