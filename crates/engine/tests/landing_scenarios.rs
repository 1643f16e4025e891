use hatetris_core::{Board, Piece, WellConfig};
use hatetris_engine::{
    collides, find_landings, Action, GraphTable, Landings, PlacementGraph, PlacementGraphs,
};

fn standard() -> (WellConfig, PlacementGraphs) {
    let config = WellConfig::standard();
    let graphs = PlacementGraphs::build(&config);
    (config, graphs)
}

/// Bottom `depth` rows filled except column 0.
fn shaft_board(config: &WellConfig, depth: usize) -> Board {
    let mut board = Board::empty(config);
    let shaft = config.full_row() & !1;
    for y in config.full_height() - depth..config.full_height() {
        board.rows_mut()[y] = shaft;
    }
    board
}

fn sites(board: &Board, graph: &PlacementGraph) -> Vec<u32> {
    match find_landings(board, graph) {
        Landings::Sites(sites) => sites.to_vec(),
        Landings::Line(id) => panic!("unexpected line at {:?}", graph.node(id).placement()),
    }
}

mod empty_well {
    use super::*;

    #[test]
    fn test_site_counts_per_piece() {
        let (config, graphs) = standard();
        let board = Board::empty(&config);
        for (piece, expected) in [(Piece::O, 9), (Piece::I, 17), (Piece::S, 17), (Piece::T, 34)] {
            assert_eq!(sites(&board, graphs.graph(piece)).len(), expected, "{piece}");
        }
    }

    #[test]
    fn test_every_site_rests_on_the_floor() {
        let (config, graphs) = standard();
        let board = Board::empty(&config);
        for graph in graphs.iter() {
            for id in sites(&board, graph) {
                let node = graph.node(id);
                assert_eq!(node.y_bottom(), config.full_height());
                assert_eq!(node.next(Action::Down), id);
            }
        }
    }
}

mod shafts {
    use super::*;

    #[test]
    fn test_vertical_i_fills_the_shaft() {
        let (config, graphs) = standard();
        let board = shaft_board(&config, 4);
        let graph = graphs.graph(Piece::I);
        let line = find_landings(&board, graph).line().expect("I fills the shaft");
        let node = graph.node(line);
        assert_eq!(node.y_bottom(), config.full_height());
        assert!(node.rows().iter().all(|&row| row == 1));

        // two columns wide everywhere, so it never reaches into the shaft
        assert!(find_landings(&board, graphs.graph(Piece::O)).line().is_none());
    }

    #[test]
    fn test_sites_above_the_shaft_never_collide() {
        let (config, graphs) = standard();
        let board = shaft_board(&config, 6);
        for piece in [Piece::O, Piece::S, Piece::Z] {
            let graph = graphs.graph(piece);
            for id in sites(&board, graph) {
                let node = graph.node(id);
                assert!(!collides(&board, node));
                assert!(node.y_bottom() <= config.full_height() - 6 + 1);
            }
        }
    }
}

mod tables {
    use super::*;

    #[test]
    fn test_reloaded_graphs_enumerate_the_same_landings() {
        let config = WellConfig::new(6, 5).unwrap();
        let built = PlacementGraphs::build(&config);
        let json = serde_json::to_string(&GraphTable::from_graphs(&built)).unwrap();
        let table: GraphTable = serde_json::from_str(&json).unwrap();
        let loaded = PlacementGraphs::from_table(&table).unwrap();

        let mut board = Board::empty(&config);
        board.set(0, 6, true);
        board.set(3, 6, true);
        board.set(5, 5, true);
        for piece in Piece::ALL {
            assert_eq!(
                find_landings(&board, built.graph(piece)),
                find_landings(&board, loaded.graph(piece)),
                "{piece}"
            );
        }
    }
}
