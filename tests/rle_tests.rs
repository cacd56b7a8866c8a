use sparselife::board::Board;
use sparselife::controller::Controller;
use sparselife::coord::Coord;
use sparselife::events::Event;
use sparselife::parse_rle;
use sparselife::render::Frame;
use sparselife::render::RenderMode;
use sparselife::rule_set::B3S23;
use sparselife::viewport::Viewport;

const PATTERNS: &[(&str, &str, usize)] = &[
    (
        "glider",
        "#N Glider\n#C A period 4 spaceship\nx = 3, y = 3, rule = B3/S23\nbob$2bo$3o!\n",
        5,
    ),
    ("blinker", "x = 3, y = 1\n3o!", 3),
    (
        "pulsar",
        "#N Pulsar\nx = 13, y = 13, rule = B3/S23\n2b3o3b3o2b2$o4bobo4bo$o4bobo4bo$o4bobo4bo$2b3o3b3o2b2$2b3o3b3o2b$o4bobo4bo$o4bobo4bo$o4bobo4bo2$2b3o3b3o!",
        48,
    ),
    (
        "gosper glider gun",
        "#N Gosper glider gun\r\nx = 36, y = 9, rule = B3/S23\r\n24bo11b$22bobo11b$12b2o6b2o12b2o$11bo3bo4b2o12b2o$2o8bo5bo3b2o14b$2o8bo3bob2o4bobo11b$10bo5bo7bo11b$11bo3bo20b$12b2o22b!\r\n",
        36,
    ),
];

fn load(bytes: &[u8]) -> anyhow::Result<Board> {
    let mut cells = Vec::new();
    let file = parse_rle::read_rle(bytes, |x, y| cells.push(Coord::new(x, y)))?;

    let mut board = Board::with_rules(file.rules());
    board.extend(cells);

    Ok(board)
}

#[test]
fn test_patterns() -> anyhow::Result<()> {
    let mut failed = Vec::new();

    for &(name, rle, population) in PATTERNS {
        match load(rle.as_bytes()) {
            Ok(board) if board.population() == population => {}
            Ok(board) => failed.push(format!(
                "{name}: expected {population} cells, got {}",
                board.population()
            )),
            Err(e) => failed.push(format!("{name}: {e:#}")),
        }
    }

    assert!(failed.is_empty(), "{}", failed.join("\n"));

    Ok(())
}

#[test]
fn pulsar_has_period_three() -> anyhow::Result<()> {
    let (_, rle, _) = PATTERNS[2];
    let mut board = load(rle.as_bytes())?;
    let start: Vec<Coord> = {
        let mut cells: Vec<_> = board.cells().collect();
        cells.sort();
        cells
    };

    for generation in 1..=3 {
        board.step();

        let mut cells: Vec<_> = board.cells().collect();
        cells.sort();
        assert_eq!(cells == start, generation == 3, "generation {generation}");
    }

    Ok(())
}

#[test]
fn gun_fires_a_glider_every_thirty_generations() -> anyhow::Result<()> {
    let (_, rle, _) = PATTERNS[3];
    let mut board = load(rle.as_bytes())?;
    assert_eq!(board.rules(), B3S23);

    let mut populations = Vec::new();
    for _ in 0..4 {
        for _ in 0..30 {
            board.step();
        }

        populations.push(board.population());
    }

    // same phase of the gun every period, with one more glider flying away
    for pair in populations.windows(2) {
        assert_eq!(pair[1], pair[0] + 5, "populations: {populations:?}");
    }

    Ok(())
}

#[test]
fn pattern_renders_through_the_controller() -> anyhow::Result<()> {
    let (_, rle, _) = PATTERNS[0];
    let board = load(rle.as_bytes())?;

    let mode = RenderMode::Glyph {
        live: 'o',
        dead: '.',
    };
    let mut controller = Controller::new(board, Viewport::new(5, 4));
    let mut frame = Frame::new(5, 4, mode);

    frame.draw(&controller.visible_cells());
    insta::assert_snapshot!(frame.render(), @r"
    .o...
    ..o..
    ooo..
    .....
    ");

    for _ in 0..4 {
        controller.handle(Event::Step);
    }

    frame.reset();
    frame.draw(&controller.visible_cells());
    insta::assert_snapshot!(frame.render(), @r"
    .....
    ..o..
    ...o.
    .ooo.
    ");

    Ok(())
}
