#[cfg(test)]
pub mod test {
    use anyhow::Result;

    use crate::{
        config::*,
        game_state::{DRAW_SCORE, LOSS_SCORE, WIN_SCORE},
        player::*,
        search::SearchEngine,
        session::{play_out, Match},
        tournament::{opening, opening_count, run_openings},
        GameError, GameState, MoveError, Outcome, Player,
    };

    const DRAWN_BOARD: [&str; 6] = [
        "OOXXOOX", //
        "XXOOXXO", //
        "OOXXOOX", //
        "XXOOXXO", //
        "OOXXOOX", //
        "XXOOXXO", //
    ];

    // player one has 3 along the bottom and only column 4 completes them
    const IMMEDIATE_WIN: [&str; 6] = [
        ".......", //
        ".......", //
        ".......", //
        ".......", //
        "..X....", //
        "XOOO..X", //
    ];

    const SHALLOW_WIN: [&str; 6] = [
        ".......", //
        ".......", //
        "O......", //
        "X......", //
        "OX....X", //
        "XOOO..X", //
    ];

    // player two threatens column 3, every other move loses on the reply
    const SINGLE_DEFENCE: [&str; 6] = [
        ".......", //
        ".......", //
        ".......", //
        ".......", //
        "O......", //
        "XXX.OO.", //
    ];

    fn swapped(rows: &[&str]) -> Vec<String> {
        rows.iter()
            .map(|row| {
                row.chars()
                    .map(|c| match c {
                        'O' => 'X',
                        'X' => 'O',
                        other => other,
                    })
                    .collect()
            })
            .collect()
    }

    fn engine(depth: usize, and_expansion: AndExpansion) -> SearchEngine {
        SearchEngine::with_config(EngineConfig {
            depth,
            and_expansion,
        })
    }

    // plain minimax with the same scorer and horizon, for cross-checking
    fn minimax(state: &GameState, depth: usize, root: Player) -> i32 {
        if depth == 0 || state.is_terminal() {
            return state.score(root);
        }
        let values = state.legal_moves().into_iter().map(|column| {
            let mut next = state.clone();
            next.apply(column).unwrap();
            minimax(&next, depth - 1, root)
        });
        let best = if state.current_player() == root {
            values.max()
        } else {
            values.min()
        };
        best.unwrap()
    }

    fn assert_no_floating_pieces(state: &GameState) {
        let board = state.board();
        for col in 0..board.cols() {
            for row in 0..board.rows() - 1 {
                if !board.get(row, col).is_empty() {
                    assert!(
                        !board.get(row + 1, col).is_empty(),
                        "floating piece at row {} column {}",
                        row,
                        col
                    );
                }
            }
        }
    }

    #[test]
    pub fn four_in_a_row_horizontal() -> Result<()> {
        let state = GameState::from_rows(
            &[
                ".......", //
                ".......", //
                ".......", //
                ".......", //
                ".......", //
                "OOOO...", //
            ],
            Player::PlayerTwo,
        )?;
        assert!(state.find_four(Player::PlayerOne));
        assert!(!state.find_four(Player::PlayerTwo));
        Ok(())
    }

    #[test]
    pub fn four_in_a_row_vertical() -> Result<()> {
        let state = GameState::from_rows(
            &[
                ".......", //
                ".......", //
                "..X....", //
                "..X....", //
                "..X....", //
                "..X....", //
            ],
            Player::PlayerOne,
        )?;
        assert!(state.find_four(Player::PlayerTwo));
        assert!(!state.find_four(Player::PlayerOne));
        Ok(())
    }

    #[test]
    pub fn four_in_a_row_rising_diagonal() -> Result<()> {
        let state = GameState::from_rows(
            &[
                ".......", //
                ".......", //
                "...X...", //
                "..XO...", //
                ".XOO...", //
                "XOOO...", //
            ],
            Player::PlayerOne,
        )?;
        assert!(state.find_four(Player::PlayerTwo));
        assert!(!state.find_four(Player::PlayerOne));
        Ok(())
    }

    #[test]
    pub fn four_in_a_row_falling_diagonal() -> Result<()> {
        let state = GameState::from_rows(
            &[
                ".......", //
                ".......", //
                "...X...", //
                "...OX..", //
                "...OOX.", //
                "...OOOX", //
            ],
            Player::PlayerOne,
        )?;
        assert!(state.find_four(Player::PlayerTwo));
        assert!(!state.find_four(Player::PlayerOne));
        Ok(())
    }

    #[test]
    pub fn three_in_a_row_is_not_four() -> Result<()> {
        let rows = [
            ".......", //
            ".......", //
            ".......", //
            "O..X...", //
            "O.XO...", //
            "OXXXOX.", //
        ];
        let state = GameState::from_rows(&rows, Player::PlayerOne)?;
        assert!(!state.find_four(Player::PlayerOne));
        assert!(!state.find_four(Player::PlayerTwo));
        assert!(!state.is_terminal());
        assert_eq!(state.score(Player::PlayerOne), DRAW_SCORE);
        Ok(())
    }

    #[test]
    pub fn find_four_symmetric_under_swap() -> Result<()> {
        let boards: [[&str; 6]; 3] = [
            IMMEDIATE_WIN,
            [
                ".......", //
                ".......", //
                "...X...", //
                "..XO...", //
                ".XOO...", //
                "XOOO...", //
            ],
            DRAWN_BOARD,
        ];
        for rows in boards.iter() {
            let state = GameState::from_rows(rows, Player::PlayerOne)?;
            let mirror = GameState::from_rows(&swapped(rows), Player::PlayerOne)?;
            assert_eq!(
                state.find_four(Player::PlayerOne),
                mirror.find_four(Player::PlayerTwo)
            );
            assert_eq!(
                state.find_four(Player::PlayerTwo),
                mirror.find_four(Player::PlayerOne)
            );
        }
        Ok(())
    }

    #[test]
    pub fn four_on_larger_board() -> Result<()> {
        let mut state = GameState::new(8, 9)?;
        // player one climbs the last column while player two plays elsewhere
        state.play_moves(&[8, 0, 8, 1, 8, 0, 8])?;
        assert!(state.find_four(Player::PlayerOne));
        assert_eq!(state.outcome(Player::PlayerTwo), Outcome::Loss(Player::PlayerTwo));
        Ok(())
    }

    #[test]
    pub fn apply_stacks_pieces_and_alternates_players() -> Result<()> {
        let mut state = GameState::default();
        let moves = [3, 3, 4, 2, 3, 5, 0, 6, 6, 6, 1];
        for (i, &column) in moves.iter().enumerate() {
            let mover = state.current_player();
            let height = state.board().height(column);
            state.apply(column)?;

            assert_eq!(state.current_player(), mover.opponent());
            assert_eq!(state.board().height(column), height + 1);
            // the new piece sits directly on top of the stack
            let row = state.board().rows() - 1 - height;
            assert_eq!(state.board().get(row, column), mover.cell());
            assert_eq!(state.num_moves(), i + 1);
            assert_no_floating_pieces(&state);
        }
        Ok(())
    }

    #[test]
    pub fn legal_moves_ascending() -> Result<()> {
        let mut state = GameState::new(4, 5)?;
        assert_eq!(state.legal_moves(), vec![0, 1, 2, 3, 4]);

        state.play_moves(&[2, 2, 2, 2])?;
        assert_eq!(state.legal_moves(), vec![0, 1, 3, 4]);
        Ok(())
    }

    #[test]
    pub fn full_column_rejected() -> Result<()> {
        let mut state = GameState::default();
        for _ in 0..6 {
            state.apply(3)?;
        }
        let before = state.clone();

        let err = state.apply(3).unwrap_err();
        assert_eq!(err, GameError::InvalidMove(MoveError::ColumnFull { column: 3 }));
        assert!(err.is_invalid_move());
        assert_eq!(state, before);
        assert!(!state.legal_moves().contains(&3));
        Ok(())
    }

    #[test]
    pub fn out_of_range_column_rejected() -> Result<()> {
        let mut state = GameState::default();
        let err = state.apply(7).unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidMove(MoveError::OutOfRange { column: 7, cols: 7 })
        );
        assert_eq!(state.num_moves(), 0);
        assert_eq!(state.current_player(), Player::PlayerOne);
        Ok(())
    }

    #[test]
    pub fn bottom_row_four_for_player_one() -> Result<()> {
        let state = GameState::from_rows(
            &[
                ".......", //
                ".......", //
                ".......", //
                ".......", //
                ".......", //
                "OOOO...", //
            ],
            Player::PlayerTwo,
        )?;
        assert!(state.find_four(Player::PlayerOne));
        assert!(!state.find_four(Player::PlayerTwo));
        assert!(state.is_terminal());
        assert_eq!(state.score(Player::PlayerOne), WIN_SCORE);
        assert_eq!(state.score(Player::PlayerTwo), LOSS_SCORE);
        assert_eq!(state.outcome(Player::PlayerOne), Outcome::Win(Player::PlayerOne));
        Ok(())
    }

    #[test]
    pub fn full_board_without_four_is_a_draw() -> Result<()> {
        let mut state = GameState::from_rows(&DRAWN_BOARD, Player::PlayerOne)?;
        assert!(state.is_terminal());
        assert!(state.legal_moves().is_empty());
        assert_eq!(state.score(Player::PlayerOne), 0);
        assert_eq!(state.score(Player::PlayerTwo), 0);
        assert_eq!(state.outcome(Player::PlayerOne), Outcome::Draw);
        assert_eq!(state.apply(0), Err(GameError::NoLegalMove));
        Ok(())
    }

    #[test]
    pub fn rejects_bad_dimensions() {
        assert!(matches!(
            GameState::new(3, 7),
            Err(GameError::InvalidDimensions { rows: 3, cols: 7, .. })
        ));
        assert!(GameState::new(6, 17).is_err());
        assert!(crate::new_game(6, 7).is_ok());
    }

    #[test]
    pub fn engine_takes_immediate_win() -> Result<()> {
        let state = GameState::from_rows(&IMMEDIATE_WIN, Player::PlayerOne)?;
        for depth in 1..=4 {
            for &mode in [AndExpansion::Sequential, AndExpansion::Simultaneous].iter() {
                let report = engine(depth, mode).search(&state)?;
                assert_eq!(report.column, 4, "depth {} {:?}", depth, mode);
                assert_eq!(report.value, WIN_SCORE);
            }
        }
        Ok(())
    }

    #[test]
    pub fn engine_prefers_the_shallowest_win() -> Result<()> {
        // columns 1 and 2 also win within three plies, column 4 wins at once
        let state = GameState::from_rows(&SHALLOW_WIN, Player::PlayerOne)?;
        for depth in 3..=4 {
            for column in 1..=2 {
                let mut next = state.clone();
                next.apply(column)?;
                assert_eq!(minimax(&next, depth - 1, Player::PlayerOne), WIN_SCORE);
            }
            for &mode in [AndExpansion::Sequential, AndExpansion::Simultaneous].iter() {
                let report = engine(depth, mode).search(&state)?;
                assert_eq!(report.column, 4, "depth {} {:?}", depth, mode);
                assert_eq!(report.value, WIN_SCORE);
            }
        }
        Ok(())
    }

    #[test]
    pub fn engine_blocks_the_only_threat() -> Result<()> {
        let state = GameState::from_rows(&SINGLE_DEFENCE, Player::PlayerOne)?;
        for depth in 2..=4 {
            for &mode in [AndExpansion::Sequential, AndExpansion::Simultaneous].iter() {
                let column = engine(depth, mode).choose_move(&state)?;
                assert_eq!(column, 3, "depth {} {:?}", depth, mode);
            }
        }
        Ok(())
    }

    #[test]
    pub fn engine_blocks_for_player_two() -> Result<()> {
        let state = GameState::from_rows(&swapped(&SINGLE_DEFENCE), Player::PlayerTwo)?;
        assert_eq!(SearchEngine::new(3).choose_move(&state)?, 3);
        Ok(())
    }

    #[test]
    pub fn engine_is_deterministic() -> Result<()> {
        let mut state = GameState::default();
        state.play_moves(&[3, 2, 3])?;

        let mut shared = SearchEngine::new(4);
        let first = shared.search(&state)?;
        for _ in 0..3 {
            assert_eq!(shared.search(&state)?, first);
            assert_eq!(SearchEngine::new(4).search(&state)?, first);
        }
        Ok(())
    }

    #[test]
    pub fn engine_does_not_touch_callers_state() -> Result<()> {
        let mut state = GameState::default();
        state.play_moves(&[0, 1, 2])?;
        let before = state.clone();

        let mut engine = SearchEngine::new(5);
        engine.choose_move(&state)?;
        assert_eq!(state, before);
        assert!(engine.node_count > 0);
        Ok(())
    }

    #[test]
    pub fn engine_refuses_finished_games() -> Result<()> {
        let drawn = GameState::from_rows(&DRAWN_BOARD, Player::PlayerOne)?;
        assert_eq!(
            SearchEngine::new(3).choose_move(&drawn),
            Err(GameError::NoLegalMove)
        );

        let won = GameState::from_rows(
            &[
                ".......", //
                ".......", //
                ".......", //
                ".......", //
                "XXX....", //
                "OOOO...", //
            ],
            Player::PlayerTwo,
        )?;
        assert_eq!(SearchEngine::new(3).choose_move(&won), Err(GameError::NoLegalMove));
        Ok(())
    }

    #[test]
    pub fn engine_matches_minimax() -> Result<()> {
        let openings: [&[usize]; 5] = [
            &[],
            &[3, 3, 4],
            &[3, 2, 3, 2, 3],
            &[0, 1, 2, 3, 4, 5, 6, 0, 1],
            &[3, 3, 3, 3, 2, 4, 2, 4],
        ];
        for moves in openings.iter() {
            let mut state = GameState::default();
            state.play_moves(moves)?;
            let root = state.current_player();

            for depth in 1..=4 {
                let expected = minimax(&state, depth, root);
                for &mode in [AndExpansion::Sequential, AndExpansion::Simultaneous].iter() {
                    let report = engine(depth, mode).search(&state)?;
                    assert_eq!(report.value, expected, "{:?} depth {} {:?}", moves, depth, mode);

                    // the chosen move really achieves the reported value
                    let mut next = state.clone();
                    next.apply(report.column)?;
                    assert_eq!(minimax(&next, depth - 1, root), expected);
                }
            }
        }
        Ok(())
    }

    #[test]
    pub fn sequential_expansion_stays_below_full_tree() -> Result<()> {
        let state = GameState::default();
        let report = SearchEngine::new(4).search(&state)?;
        // 1 + 7 + 49 + 343 + 2401 positions in the full tree
        assert!(report.nodes_expanded < 2801);
        assert!(report.peak_open > 0);
        Ok(())
    }

    #[test]
    pub fn interactive_player_accepts_one_legal_column() -> Result<()> {
        let mut state = GameState::default();
        let mut player = InteractivePlayer::new();

        assert_eq!(player.choose_move(&state), Err(GameError::AwaitingMove));
        assert!(player.submit(&state, 9).unwrap_err().is_invalid_move());
        assert!(!player.has_pending());

        player.submit(&state, 2)?;
        assert_eq!(
            player.submit(&state, 4),
            Err(GameError::MoveAlreadySubmitted)
        );
        let column = player.choose_move(&state)?;
        assert_eq!(column, 2);
        state.apply(column)?;
        assert_eq!(player.choose_move(&state), Err(GameError::AwaitingMove));
        Ok(())
    }

    #[test]
    pub fn interactive_player_rejects_full_column() -> Result<()> {
        let mut state = GameState::default();
        state.play_moves(&[5, 5, 5, 5, 5, 5])?;
        let mut player = InteractivePlayer::new();
        assert_eq!(
            player.submit(&state, 5),
            Err(GameError::InvalidMove(MoveError::ColumnFull { column: 5 }))
        );
        assert!(!player.has_pending());
        Ok(())
    }

    #[test]
    pub fn search_players_finish_a_game() -> Result<()> {
        let mut first = SearchPlayer::new(EngineConfig {
            depth: 2,
            ..EngineConfig::default()
        });
        let mut second = SearchPlayer::new(EngineConfig {
            depth: 3,
            ..EngineConfig::default()
        });
        let finished = play_out(GameState::default(), &mut first, &mut second)?;
        assert!(finished.is_terminal());
        assert!(first.last_report().is_some());
        assert_no_floating_pieces(&finished);
        Ok(())
    }

    #[test]
    pub fn play_out_waits_for_interactive_input() {
        let mut human = InteractivePlayer::new();
        let mut engine = SearchPlayer::new(EngineConfig::default());
        assert_eq!(
            play_out(GameState::default(), &mut human, &mut engine),
            Err(GameError::AwaitingMove)
        );
    }

    #[test]
    pub fn match_human_wins_against_shallow_engine() -> Result<()> {
        let mut game = Match::new(GameConfig {
            engine: EngineConfig {
                depth: 1,
                ..EngineConfig::default()
            },
            ..GameConfig::default()
        })?;
        assert_eq!(game.opening(), None);
        assert_eq!(game.status(), "");

        // a one ply engine only looks for its own wins and stacks column 0
        for &column in [0, 1, 2].iter() {
            let report = game.play(column)?;
            assert_eq!(report.human_move, column);
            assert_eq!(report.reply, Some(0));
            assert_eq!(report.outcome, Outcome::Ongoing);
        }
        let report = game.play(3)?;
        assert_eq!(report.reply, None);
        assert_eq!(report.outcome, Outcome::Win(Player::PlayerOne));
        assert_eq!(game.status(), "You win!");

        let finished = game.state().clone();
        assert_eq!(game.play(4), Err(GameError::NoLegalMove));
        assert_eq!(game.state(), &finished);
        Ok(())
    }

    #[test]
    pub fn match_rejects_bad_column_without_side_effects() -> Result<()> {
        let mut game = Match::new(GameConfig {
            engine: EngineConfig {
                depth: 2,
                ..EngineConfig::default()
            },
            ..GameConfig::default()
        })?;
        let before = game.state().clone();
        assert!(game.play(42).unwrap_err().is_invalid_move());
        assert_eq!(game.state(), &before);

        // the rejected column does not block the next submission
        let report = game.play(3)?;
        assert!(report.reply.is_some());
        assert_eq!(game.state().num_moves(), 2);
        Ok(())
    }

    #[test]
    pub fn match_engine_opens_and_reset() -> Result<()> {
        let mut game = Match::new(GameConfig {
            engine: EngineConfig {
                depth: 3,
                ..EngineConfig::default()
            },
            human: Player::PlayerTwo,
            ..GameConfig::default()
        })?;
        assert!(game.opening().is_some());
        assert_eq!(game.state().num_moves(), 1);
        assert_eq!(game.state().current_player(), Player::PlayerTwo);

        game.play(0)?;
        assert_eq!(game.state().num_moves(), 3);

        game.reset()?;
        assert_eq!(game.state().num_moves(), 1);
        assert_eq!(game.state().current_player(), Player::PlayerTwo);
        Ok(())
    }

    #[test]
    pub fn match_played_to_the_end_reports_status() -> Result<()> {
        let mut game = Match::new(GameConfig {
            engine: EngineConfig {
                depth: 3,
                ..EngineConfig::default()
            },
            ..GameConfig::default()
        })?;
        while !game.is_over() {
            let column = game.state().legal_moves()[0];
            game.play(column)?;
        }
        let expected = match game.outcome() {
            Outcome::Win(_) => "You win!",
            Outcome::Loss(_) => "AI wins!",
            Outcome::Draw => "Draw!",
            Outcome::Ongoing => unreachable!(),
        };
        assert_eq!(game.status(), expected);
        Ok(())
    }

    #[test]
    pub fn match_rejects_invalid_config() {
        let result = Match::new(GameConfig {
            rows: 2,
            ..GameConfig::default()
        });
        assert!(matches!(result, Err(GameError::Config(_))));
    }

    #[test]
    pub fn tournament_tally_counts_every_game() -> Result<()> {
        let config = TournamentConfig {
            games: 5,
            depths: [1, 2],
            ..TournamentConfig::default()
        };
        let tally = run_openings(&config, None)?;
        assert_eq!(tally.games(), 5);
        Ok(())
    }

    #[test]
    pub fn tournament_openings() {
        assert_eq!(opening(0, 7), [0, 0]);
        assert_eq!(opening(8, 7), [1, 1]);
        assert_eq!(opening(48, 7), [6, 6]);

        let config = TournamentConfig {
            games: 1000,
            ..TournamentConfig::default()
        };
        assert_eq!(opening_count(&config), 49);
    }

    #[test]
    pub fn error_messages() {
        assert_eq!(
            GameError::InvalidMove(MoveError::ColumnFull { column: 2 }).to_string(),
            "invalid move, column 2 full"
        );
        assert_eq!(
            GameError::InvalidMove(MoveError::OutOfRange { column: 9, cols: 7 }).to_string(),
            "invalid move, column 9 out of range, the board has 7 columns"
        );
        assert_eq!(
            GameError::NoLegalMove.to_string(),
            "no legal move, the game is already over"
        );
    }
}
