use pretty_assertions::assert_eq;
use strum::IntoEnumIterator;

use super::*;
use crate::common::config::{AspectDefault, LayoutDefaults};
use crate::model::GroupKey;
use crate::sys::geometry::{Rect, RectExt};
use crate::sys::host::WindowId;

fn even(n: usize) -> Vec<f64> { (0..=n).map(|i| i as f64 / n as f64).collect() }

fn grid(columns: usize, rows: usize, gap: f64, cascade_indent: f64) -> GridLayout {
    GridLayout {
        v_edges: even(columns),
        h_edges: even(rows),
        gap,
        cascade_indent,
        no_border: false,
    }
}

fn screen() -> Rect { Rect::new(0.0, 0.0, 1920.0, 1080.0) }

fn walk(start: Option<GridPosition>, moves: &[Direction], layout: &GridLayout) -> GridPosition {
    let mut position = start;
    for &direction in moves {
        position = Some(next_position(position, direction, layout, false));
    }
    position.expect("at least one move")
}

mod movement {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_walk_stays_inside_the_grid() {
        let layouts = [grid(1, 1, 0.0, 0.0), grid(2, 2, 10.0, 0.0), grid(4, 3, 5.0, 0.0)];
        for layout in &layouts {
            for first in Direction::iter() {
                let mut position = next_position(None, first, layout, false);
                for _ in 0..3 {
                    for direction in Direction::iter() {
                        position = next_position(Some(position), direction, layout, false);
                        assert_eq!(fit_position(position, layout), position);
                        let frame = cell_rect(position, layout, screen(), CascadeSlot::ALONE);
                        assert!(screen().contains_rect(frame), "{position} -> {frame:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn moving_up_narrows_then_snaps_to_full_grid() {
        let layout = grid(2, 2, 0.0, 0.0);
        assert_eq!(walk(None, &[Direction::Left], &layout), GridPosition::new(0, 0, 1, 2));
        assert_eq!(
            walk(None, &[Direction::Left, Direction::Up], &layout),
            GridPosition::new(0, 0, 1, 1)
        );
        assert_eq!(
            walk(None, &[Direction::Left, Direction::Up, Direction::Up], &layout),
            GridPosition::new(0, 0, 2, 2)
        );
    }

    #[test]
    fn down_then_right_reaches_the_bottom_right_cell() {
        let layout = grid(3, 3, 0.0, 0.0);
        let position = walk(
            None,
            &[Direction::Right, Direction::Down, Direction::Down],
            &layout,
        );
        assert_eq!(position, GridPosition::new(2, 2, 3, 3));
        assert_eq!(
            cell_rect(position, &layout, screen(), CascadeSlot::ALONE),
            Rect::new(1280.0, 720.0, 640.0, 360.0)
        );
    }

    #[test]
    fn positions_follow_a_layout_switch() {
        let wide = grid(4, 3, 0.0, 0.0);
        let narrow = grid(2, 1, 0.0, 0.0);
        let position = walk(None, &[Direction::Right, Direction::Down], &wide);
        assert_eq!(position, GridPosition::new(3, 1, 4, 3));
        assert_eq!(fit_position(position, &narrow), GridPosition::new(1, 0, 2, 1));
    }
}

mod geometry {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn spacing_between_neighbours_matches_screen_margin() {
        let layout = grid(2, 1, 10.0, 0.0);
        let left = cell_rect(GridPosition::new(0, 0, 1, 1), &layout, screen(), CascadeSlot::ALONE);
        let right = cell_rect(GridPosition::new(1, 0, 2, 1), &layout, screen(), CascadeSlot::ALONE);
        assert_eq!(left.x - screen().x, 20.0);
        assert_eq!(right.x - left.max().x, 20.0);
        assert_eq!(screen().max().x - right.max().x, 20.0);
        assert_eq!(left.y, 20.0);
        assert_eq!(left.height, 1040.0);
    }

    #[test]
    fn cascade_fills_the_cell_and_skips_fullscreen() {
        let layout = grid(2, 2, 0.0, 25.0);
        let cell = GridPosition::new(1, 0, 2, 2);
        let full = GridPosition::new(0, 0, 2, 2);
        let candidates = [
            CascadeCandidate { wid: WindowId::new(1), position: cell, fullscreen: false },
            CascadeCandidate { wid: WindowId::new(2), position: full, fullscreen: true },
            CascadeCandidate { wid: WindowId::new(3), position: cell, fullscreen: false },
            CascadeCandidate { wid: WindowId::new(4), position: cell, fullscreen: false },
        ];

        let plan = plan_cascade(&candidates, cell, &layout);
        let frames: Vec<(u64, Rect)> = plan
            .iter()
            .map(|(c, placement)| match placement {
                CellPlacement::Cell(slot) => (c.wid.0, cell_rect(c.position, &layout, screen(), *slot)),
                CellPlacement::Fullscreen => panic!("full-screen window in a cell"),
            })
            .collect();
        assert_eq!(frames, vec![
            (1, Rect::new(960.0, 0.0, 910.0, 1030.0)),
            (3, Rect::new(985.0, 25.0, 910.0, 1030.0)),
            (4, Rect::new(1010.0, 50.0, 910.0, 1030.0)),
        ]);
        let last = frames[2].1;
        assert_eq!(last.max().x, 1920.0);
        assert_eq!(last.max().y, 1080.0);

        let plan = plan_cascade(&candidates, full, &layout);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].1, CellPlacement::Fullscreen);
    }
}

mod resizing {
    use pretty_assertions::assert_eq;

    use super::*;

    fn min_cell() -> MinCellSize { MinCellSize { width: 100.0, height: 100.0 } }

    #[test]
    fn neighbours_stay_flush_after_a_resize() {
        let layout = grid(3, 2, 0.0, 0.0);
        let area = screen();
        let left = GridPosition::new(0, 0, 1, 2);
        let middle = GridPosition::new(1, 0, 2, 1);
        let below = GridPosition::new(1, 1, 2, 2);

        let old = cell_rect(middle, &layout, area, CascadeSlot::ALONE);
        let mut new = old;
        new.x -= 140.0;
        new.width += 140.0;
        new.height += 90.0;
        let adjusted = adjust_edges(&layout, middle, old, new, area, min_cell()).expect("resized");

        let left = cell_rect(left, &adjusted, area, CascadeSlot::ALONE);
        let middle = cell_rect(middle, &adjusted, area, CascadeSlot::ALONE);
        let below = cell_rect(below, &adjusted, area, CascadeSlot::ALONE);
        assert_eq!(left.max().x, middle.x);
        assert_eq!(middle.x, 500.0);
        assert_eq!(middle.max().y, below.y);
        assert_eq!(below.y, 630.0);
        assert_eq!(below.x, middle.x);
    }

    #[test]
    fn customized_layout_is_dropped_on_switch() {
        let catalog = LayoutCatalog::new(
            vec![grid(2, 2, 0.0, 0.0), grid(3, 3, 0.0, 0.0)],
            GridLayout::from(&LayoutDefaults::default()),
            vec![AspectDefault { min_ratio: 1.5, layout: 1 }],
        );
        let mut selections = LayoutSelections::default();
        let group = GroupKey::plain(0, 1);
        let area = screen();

        let initial = selections.resolve(&group, &catalog, area);
        assert_eq!(initial.columns(), 3);

        let old = cell_rect(GridPosition::new(0, 0, 1, 3), &initial, area, CascadeSlot::ALONE);
        let mut new = old;
        new.width += 100.0;
        let adjusted = adjust_edges(&initial, GridPosition::new(0, 0, 1, 3), old, new, area, min_cell())
            .expect("resized");
        selections.customize(&group, adjusted.clone(), &catalog, area);
        assert!(selections.is_customized(&group));
        assert_eq!(selections.resolve(&group, &catalog, area), adjusted);

        assert_eq!(selections.switch(&group, LayoutStep::Prev, &catalog, area), 0);
        assert!(!selections.is_customized(&group));
        assert_eq!(selections.resolve(&group, &catalog, area).columns(), 2);
    }
}
