use tilenav_core::{
    BuildOptions, CostModel, Grid, MovementType, PathOutcome, PathType, Pathfinder, Position, SearchOptions, TileMap,
    TileMode, TileRecord,
};

fn straight_line(len: i32) -> Grid {
    let mut map = TileMap::new();
    for x in 0..len {
        map.push(x, 0, TileRecord::new(0, TileMode::Surface));
    }
    Grid::build(&map, map.bounds().unwrap(), &BuildOptions::default()).unwrap()
}

fn at(x: i32) -> Position {
    Position::new(x, 0, 0)
}

#[test]
fn range_two_on_line_reaches_three_leftmost() {
    let grid = straight_line(5);
    let pf = Pathfinder::new(&grid, CostModel::default());
    let reach = pf.range(at(0), 2, MovementType::Grounded);

    let mut xs: Vec<i32> = reach.nodes().iter().map(|&n| grid.node(n).position().x).collect();
    xs.sort();
    assert_eq!(xs, vec![0, 1, 2]);
    assert_eq!(reach.cost_to(grid.node_id(at(2)).unwrap()), Some(2));
    assert!(!reach.contains(grid.node_id(at(3)).unwrap()));
}

#[test]
fn path_across_line_costs_four() {
    let grid = straight_line(5);
    let pf = Pathfinder::new(&grid, CostModel::default());
    let path = pf.path(at(0), at(4), MovementType::Grounded);

    assert!(path.is_found());
    assert_eq!(path.len(), 5);
    assert_eq!(path.cost(), 4);
    let backwards: Vec<i32> = path.nodes().iter().map(|&n| grid.node(n).position().x).collect();
    assert_eq!(backwards, vec![4, 3, 2, 1, 0]);
    let forward: Vec<i32> = path.into_forward().iter().map(|&n| grid.node(n).position().x).collect();
    assert_eq!(forward, vec![0, 1, 2, 3, 4]);
}

#[test]
fn missing_node_yields_empty_results() {
    let grid = straight_line(3);
    let pf = Pathfinder::new(&grid, CostModel::default());
    assert!(pf.range(Position::new(0, 5, 0), 10, MovementType::Grounded).is_empty());
    let path = pf.path(at(0), Position::new(0, 0, 4), MovementType::Grounded);
    assert!(path.is_empty());
    assert_eq!(path.outcome(), PathOutcome::MissingDestination);
}

#[test]
fn disconnected_islands_have_no_path() {
    let map = TileMap::new()
        .with(0, 0, TileRecord::new(0, TileMode::Surface))
        .with(1, 0, TileRecord::new(0, TileMode::Surface))
        .with(3, 0, TileRecord::new(0, TileMode::Surface));
    let grid = Grid::build(&map, map.bounds().unwrap(), &BuildOptions::default()).unwrap();
    let pf = Pathfinder::new(&grid, CostModel::default());
    let path = pf.path(at(0), at(3), MovementType::Grounded);
    assert!(path.is_empty());
    assert_eq!(path.outcome(), PathOutcome::NoPath);
    assert!(path.expanded() >= 2);
}

#[test]
fn path_climbs_via_ramp() {
    // Flat ground at 0, a ramp at elevation 0 next to a plateau at 1. The
    // direct step from flat ground to the plateau is not allowed.
    let map = TileMap::new()
        .with(0, 0, TileRecord::new(0, TileMode::Surface))
        .with(0, 1, TileRecord::new(0, TileMode::Surface))
        .with(1, 1, TileRecord::new(0, TileMode::Transitional))
        .with(1, 0, TileRecord::new(1, TileMode::Surface))
        .with(2, 0, TileRecord::new(1, TileMode::Surface));
    let grid = Grid::build(&map, map.bounds().unwrap(), &BuildOptions::default()).unwrap();
    let pf = Pathfinder::new(&grid, CostModel::default());
    let path = pf.path(Position::new(0, 0, 0), Position::new(2, 0, 1), MovementType::Grounded);

    let route: Vec<Position> = path.into_forward().iter().map(|&n| grid.node(n).position()).collect();
    assert_eq!(
        route,
        vec![
            Position::new(0, 0, 0),
            Position::new(0, 1, 0),
            Position::new(1, 1, 0),
            Position::new(1, 0, 1),
            Position::new(2, 0, 1),
        ]
    );
}

#[test]
fn cheaper_detour_beats_short_expensive_route() {
    // 3x2 block; the middle of the bottom row is a costly ramp
    let mut map = TileMap::new();
    for x in 0..3 {
        map.push(x, 1, TileRecord::new(0, TileMode::Surface));
        let mode = if x == 1 { TileMode::Transitional } else { TileMode::Surface };
        map.push(x, 0, TileRecord::new(0, mode));
    }
    let grid = Grid::build(&map, map.bounds().unwrap(), &BuildOptions::default()).unwrap();
    assert_eq!(grid.get(Position::new(1, 0, 0)).unwrap().path_type(), PathType::Transitional);

    let pf = Pathfinder::new(&grid, CostModel { surface_step: 1, transitional_step: 10 });
    let path = pf.path(Position::new(0, 0, 0), Position::new(2, 0, 0), MovementType::Grounded);
    assert_eq!(path.cost(), 4);
    assert!(path.nodes().iter().all(|&n| grid.node(n).path_type() == PathType::Surface));

    let reach = pf.range(Position::new(0, 0, 0), 4, MovementType::Grounded);
    let far = grid.node_id(Position::new(2, 0, 0)).unwrap();
    assert_eq!(reach.cost_to(far), Some(4));
    assert_eq!(reach.path_to(far).len(), 5);
}

#[test]
fn occupants_do_not_affect_search() {
    let mut grid = straight_line(3);
    grid.add_occupant(at(1), tilenav_core::EntityId(1));
    let pf = Pathfinder::new(&grid, CostModel::default());
    assert_eq!(pf.path(at(0), at(2), MovementType::Grounded).cost(), 2);
}

/// Two rows with a gap at (1, 1). The ramp at (2, 1) sits on the straight
/// line from (3, 1) to (0, 1), so a best-first search reaches (2, 0) through
/// it before finding the cheaper way round via (3, 0).
fn notched_rows() -> Grid {
    let mut map = TileMap::new();
    for x in 0..4 {
        map.push(x, 0, TileRecord::new(0, TileMode::Surface));
    }
    map.push(0, 1, TileRecord::new(0, TileMode::Surface));
    map.push(2, 1, TileRecord::new(0, TileMode::Transitional));
    map.push(3, 1, TileRecord::new(0, TileMode::Surface));
    Grid::build(&map, map.bounds().unwrap(), &BuildOptions::default()).unwrap()
}

fn pos(x: i32, y: i32) -> Position {
    Position::new(x, y, 0)
}

#[test]
fn path_lowers_cost_of_node_first_reached_through_ramp() {
    let grid = notched_rows();
    let costs = CostModel { surface_step: 1, transitional_step: 2 };
    let expected = vec![pos(3, 1), pos(3, 0), pos(2, 0), pos(1, 0), pos(0, 0), pos(0, 1)];

    let pf = Pathfinder::new(&grid, costs.clone());
    let path = pf.path(pos(3, 1), pos(0, 1), MovementType::Grounded);
    assert_eq!(path.cost(), 5);
    let route: Vec<Position> = path.into_forward().iter().map(|&n| grid.node(n).position()).collect();
    assert_eq!(route, expected);

    // Draining the frontier pops the superseded (2, 0) entry and must skip it
    let drain = SearchOptions { stop_at_goal: false, ..SearchOptions::default() };
    let pf = Pathfinder::new(&grid, costs).with_options(drain);
    let path = pf.path(pos(3, 1), pos(0, 1), MovementType::Grounded);
    assert_eq!(path.cost(), 5);
    let route: Vec<Position> = path.into_forward().iter().map(|&n| grid.node(n).position()).collect();
    assert_eq!(route, expected);
}

#[test]
fn range_records_cheapest_predecessor() {
    let grid = notched_rows();
    let pf = Pathfinder::new(&grid, CostModel { surface_step: 1, transitional_step: 10 });
    let reach = pf.range(pos(3, 1), 5, MovementType::Grounded);

    let id = |p: Position| grid.node_id(p).unwrap();
    assert_eq!(reach.cost_to(id(pos(2, 0))), Some(2));
    assert_eq!(reach.came_from(id(pos(2, 0))), Some(id(pos(3, 0))));
    assert_eq!(reach.cost_to(id(pos(0, 1))), Some(5));
    // The ramp costs 10 to enter from either side
    assert!(!reach.contains(id(pos(2, 1))));
    let back: Vec<Position> = reach.path_to(id(pos(0, 1))).iter().map(|&n| grid.node(n).position()).collect();
    assert_eq!(back, vec![pos(0, 1), pos(0, 0), pos(1, 0), pos(2, 0), pos(3, 0), pos(3, 1)]);
}

#[test]
fn path_between_nodes_at_the_coordinate_limit() {
    let map = TileMap::new()
        .with(i32::MAX - 1, i32::MAX, TileRecord::new(0, TileMode::Surface))
        .with(i32::MAX, i32::MAX, TileRecord::new(0, TileMode::Surface));
    let grid = Grid::build(&map, map.bounds().unwrap(), &BuildOptions::default()).unwrap();
    let pf = Pathfinder::new(&grid, CostModel::default());
    let corner = Position::new(i32::MAX, i32::MAX, 0);

    let far = pf.path(Position::new(i32::MIN, i32::MIN, 0), corner, MovementType::Grounded);
    assert_eq!(far.outcome(), PathOutcome::MissingOrigin);
    let step = pf.path(Position::new(i32::MAX - 1, i32::MAX, 0), corner, MovementType::Grounded);
    assert_eq!(step.cost(), 1);
}
