//! Bundled default maze
//!
//! The classic arcade board without its outer border: 29 rows by 26 columns,
//! with the wrap-around tunnel on row 13.
//!
//! Legend: `#` wall, ` ` road, `.` pellet, `o` power item.

/// Maze rows, top to bottom
pub const DEFAULT_LAYOUT: [&str; 29] = [
    "............##............",
    ".####.#####.##.#####.####.",
    "o####.#####.##.#####.####o",
    ".####.#####.##.#####.####.",
    "..........................",
    ".####.##.########.##.####.",
    ".####.##.########.##.####.",
    "......##....##....##......",
    "#####.##### ## #####.#####",
    "#####.##### ## #####.#####",
    "#####.##          ##.#####",
    "#####.## ###  ### ##.#####",
    "#####.## #      # ##.#####",
    "     .   #      #   .     ",
    "#####.## #      # ##.#####",
    "#####.## ######## ##.#####",
    "#####.##          ##.#####",
    "#####.## ######## ##.#####",
    "#####.## ######## ##.#####",
    "............##............",
    ".####.#####.##.#####.####.",
    ".####.#####.##.#####.####.",
    "o..##.......  .......##..o",
    "##.##.##.########.##.##.##",
    "##.##.##.########.##.##.##",
    "......##....##....##......",
    ".##########.##.##########.",
    ".##########.##.##########.",
    "..........................",
];

/// Junction cells ghosts roam between in scatter mode, as (row, column)
pub const DEFAULT_WAYPOINTS: [(usize, usize); 28] = [
    (0, 5),
    (0, 20),
    (4, 0),
    (4, 5),
    (4, 8),
    (4, 11),
    (4, 14),
    (4, 17),
    (4, 20),
    (4, 25),
    (7, 5),
    (7, 20),
    (13, 5),
    (13, 20),
    (16, 8),
    (16, 17),
    (19, 5),
    (19, 8),
    (19, 17),
    (19, 20),
    (22, 5),
    (22, 8),
    (22, 17),
    (22, 20),
    (25, 2),
    (25, 23),
    (28, 11),
    (28, 14),
];

/// Where the player starts each life
pub const DEFAULT_AGENT_START: (usize, usize) = (22, 12);

/// Ghost names and home cells (one outside the house, three inside)
pub const DEFAULT_GHOSTS: [(&str, (usize, usize)); 4] = [
    ("blinky", (10, 12)),
    ("pinky", (13, 12)),
    ("inky", (13, 10)),
    ("clyde", (13, 15)),
];

/// Encode one layout character as a maze cell value
fn encode(ch: char) -> i32 {
    match ch {
        '#' => -1,
        '.' => 1,
        'o' => 2,
        _ => 0,
    }
}

/// Flatten a text layout into the integer cell encoding (row-major)
pub fn encode_layout(rows: &[&str]) -> Vec<i32> {
    rows.iter().flat_map(|row| row.chars().map(encode)).collect()
}

/// The default maze as flat cell values
pub fn default_cells() -> Vec<i32> {
    encode_layout(&DEFAULT_LAYOUT)
}
