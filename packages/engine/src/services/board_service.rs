use crate::models::game_match::PieceColor;
use crate::services::errors::board_service_errors::BoardServiceError;

/// A move in coordinate notation, parsed into grid indices.
///
/// Ranks are stored as row offsets from the top of the board so they index
/// straight into the serialized rank-major grid: rank 8 is row 0, rank 1 is
/// row 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UciMove {
    pub from_file: usize,
    pub from_rank: usize,
    pub to_file: usize,
    pub to_rank: usize,
    pub promotion: Option<char>,
}

impl UciMove {
    /// Parses coordinate notation such as "e2e4" or "a7a8q". Only shape and
    /// board bounds are checked here; whether the move makes any sense on
    /// the actual position is not this layer's concern.
    pub fn parse(uci: &str) -> Result<UciMove, BoardServiceError> {
        let bytes = uci.as_bytes();
        if bytes.len() < 4 || bytes.len() > 5 {
            return Err(BoardServiceError::MalformedMove(format!(
                "expected 4 or 5 characters, got {}",
                bytes.len()
            )));
        }

        let on_board =
            |file: u8, rank: u8| (b'a'..=b'h').contains(&file) && (b'1'..=b'8').contains(&rank);
        if !on_board(bytes[0], bytes[1]) || !on_board(bytes[2], bytes[3]) {
            return Err(BoardServiceError::MalformedMove(
                "square coordinates are off the board".to_string(),
            ));
        }

        Ok(UciMove {
            from_file: (bytes[0] - b'a') as usize,
            from_rank: (b'8' - bytes[1]) as usize,
            to_file: (bytes[2] - b'a') as usize,
            to_rank: (b'8' - bytes[3]) as usize,
            promotion: bytes.get(4).map(|b| *b as char),
        })
    }
}

/// Pure arithmetic over serialized positions.
///
/// Moves are applied blindly: whatever occupies the source square is
/// relocated onto the destination square, capturing by overwrite. Chess
/// legality is deliberately not checked, clients are trusted to agree on
/// the rules they play by.
#[derive(Clone)]
pub struct BoardService;

impl BoardService {
    pub fn new() -> Self {
        BoardService
    }

    /// Which color the stored position says moves next.
    pub fn side_to_move(&self, fen: &str) -> Result<PieceColor, BoardServiceError> {
        match fen.split_whitespace().nth(1) {
            Some("w") => Ok(PieceColor::White),
            Some("b") => Ok(PieceColor::Black),
            Some(other) => Err(BoardServiceError::InvalidPosition(format!(
                "unknown side to move '{}'",
                other
            ))),
            None => Err(BoardServiceError::InvalidPosition(
                "missing side to move field".to_string(),
            )),
        }
    }

    /// Relocates the source piece, queens any pawn landing on its far rank
    /// and flips the side to move. Castling rights, en passant and the move
    /// counters are not tracked, so the trailer of the returned position is
    /// always reset to "KQkq - 0 1".
    ///
    /// A requested promotion piece is ignored: promotion is always to a
    /// queen.
    pub fn apply_move(&self, fen: &str, uci_move: &UciMove) -> Result<String, BoardServiceError> {
        let placement = fen.split_whitespace().next().ok_or_else(|| {
            BoardServiceError::InvalidPosition("empty position".to_string())
        })?;
        let side = self.side_to_move(fen)?;

        let mut board = decode_board(placement)?;

        let mut piece = board[uci_move.from_rank][uci_move.from_file];
        board[uci_move.from_rank][uci_move.from_file] = None;

        if piece == Some('P') && uci_move.to_rank == 0 {
            piece = Some('Q');
        } else if piece == Some('p') && uci_move.to_rank == 7 {
            piece = Some('q');
        }
        board[uci_move.to_rank][uci_move.to_file] = piece;

        let next_side = match side {
            PieceColor::White => "b",
            PieceColor::Black => "w",
        };
        Ok(format!("{} {} KQkq - 0 1", encode_board(&board), next_side))
    }
}

fn decode_board(placement: &str) -> Result<[[Option<char>; 8]; 8], BoardServiceError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(BoardServiceError::InvalidPosition(format!(
            "expected 8 ranks, found {}",
            ranks.len()
        )));
    }

    let mut board = [[None; 8]; 8];
    for (rank_index, rank) in ranks.iter().enumerate() {
        let mut file = 0usize;
        for c in rank.chars() {
            match c.to_digit(10) {
                Some(empty) if (1..=8).contains(&empty) => file += empty as usize,
                Some(_) => {
                    return Err(BoardServiceError::InvalidPosition(format!(
                        "bad empty-square count '{}'",
                        c
                    )))
                }
                None if c.is_ascii_alphabetic() => {
                    if file >= 8 {
                        return Err(BoardServiceError::InvalidPosition(format!(
                            "rank {} describes more than 8 squares",
                            8 - rank_index
                        )));
                    }
                    board[rank_index][file] = Some(c);
                    file += 1;
                }
                None => {
                    return Err(BoardServiceError::InvalidPosition(format!(
                        "unexpected character '{}'",
                        c
                    )))
                }
            }
            if file > 8 {
                return Err(BoardServiceError::InvalidPosition(format!(
                    "rank {} describes more than 8 squares",
                    8 - rank_index
                )));
            }
        }
        if file != 8 {
            return Err(BoardServiceError::InvalidPosition(format!(
                "rank {} describes only {} squares",
                8 - rank_index,
                file
            )));
        }
    }
    Ok(board)
}

fn encode_board(board: &[[Option<char>; 8]; 8]) -> String {
    let mut placement = String::new();
    for (rank_index, rank) in board.iter().enumerate() {
        if rank_index > 0 {
            placement.push('/');
        }
        let mut empty_run = 0u32;
        for square in rank {
            match square {
                Some(piece) => {
                    if empty_run > 0 {
                        placement.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    placement.push(*piece);
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            placement.push_str(&empty_run.to_string());
        }
    }
    placement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game_match::STARTING_FEN;
    use proptest::prelude::*;
    use test_case::test_case;

    fn apply(fen: &str, uci: &str) -> String {
        let board_service = BoardService::new();
        let uci_move = UciMove::parse(uci).unwrap();
        board_service.apply_move(fen, &uci_move).unwrap()
    }

    #[test]
    fn test_parse_extracts_grid_indices() {
        let uci_move = UciMove::parse("e2e4").unwrap();
        assert_eq!(uci_move.from_file, 4);
        assert_eq!(uci_move.from_rank, 6);
        assert_eq!(uci_move.to_file, 4);
        assert_eq!(uci_move.to_rank, 4);
        assert!(uci_move.promotion.is_none());

        let uci_move = UciMove::parse("a7a8q").unwrap();
        assert_eq!(uci_move.from_file, 0);
        assert_eq!(uci_move.from_rank, 1);
        assert_eq!(uci_move.to_rank, 0);
        assert_eq!(uci_move.promotion, Some('q'));
    }

    #[test_case("" ; "empty string")]
    #[test_case("e2" ; "one square")]
    #[test_case("e2e" ; "three characters")]
    #[test_case("e2e4qq" ; "six characters")]
    #[test_case("i2e4" ; "from file past h")]
    #[test_case("e9e4" ; "from rank past 8")]
    #[test_case("e0e4" ; "from rank zero")]
    #[test_case("e2i4" ; "to file past h")]
    #[test_case("e2e9" ; "to rank past 8")]
    fn test_parse_rejects_malformed_notation(uci: &str) {
        let result = UciMove::parse(uci);
        assert!(matches!(result, Err(BoardServiceError::MalformedMove(_))));
    }

    #[test]
    fn test_parse_reports_shape_and_bounds_separately() {
        match UciMove::parse("e2") {
            Err(BoardServiceError::MalformedMove(msg)) => {
                assert!(msg.contains("4 or 5 characters"))
            }
            other => panic!("expected malformed move, got {:?}", other),
        }
        match UciMove::parse("z9z9") {
            Err(BoardServiceError::MalformedMove(msg)) => assert!(msg.contains("off the board")),
            other => panic!("expected malformed move, got {:?}", other),
        }
    }

    #[test]
    fn test_opening_move_reaches_known_position() {
        let fen = apply(STARTING_FEN, "e2e4");
        assert_eq!(
            fen,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
    }

    #[test]
    fn test_black_reply_flips_back_to_white() {
        let after_e4 = apply(STARTING_FEN, "e2e4");
        let fen = apply(&after_e4, "e7e5");
        assert_eq!(
            fen,
            "rnbqkbnr/pppp1ppp/4p3/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn test_capture_overwrites_destination() {
        let fen = apply(
            "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1",
            "e4d5",
        );
        assert_eq!(
            fen,
            "rnbqkbnr/ppp1pppp/8/3P4/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
    }

    #[test]
    fn test_white_pawn_queens_on_the_far_rank() {
        let fen = apply("8/P7/8/8/8/8/8/K6k w - - 0 1", "a7a8");
        assert!(fen.starts_with("Q7/"));
    }

    #[test]
    fn test_black_pawn_queens_on_the_far_rank() {
        let fen = apply("k6K/8/8/8/8/8/p7/8 b - - 0 1", "a2a1");
        assert_eq!(fen, "k6K/8/8/8/8/8/8/q7 w KQkq - 0 1");
    }

    #[test]
    fn test_requested_promotion_piece_is_ignored() {
        let fen = apply("8/P7/8/8/8/8/8/K6k w - - 0 1", "a7a8n");
        assert!(fen.starts_with("Q7/"));
    }

    #[test]
    fn test_only_pawns_promote() {
        let fen = apply("8/8/8/8/8/8/8/R6K w - - 0 1", "a1a8");
        assert_eq!(fen, "R7/8/8/8/8/8/8/7K b KQkq - 0 1");
    }

    #[test]
    fn test_geometry_is_not_checked() {
        // The rook slides straight through the a2 pawn. Blind relocation
        // accepts it.
        let fen = apply(STARTING_FEN, "a1a4");
        assert_eq!(
            fen,
            "rnbqkbnr/pppppppp/8/8/R7/8/PPPPPPPP/1NBQKBNR b KQkq - 0 1"
        );
    }

    #[test]
    fn test_moving_from_an_empty_square_relocates_nothing() {
        let fen = apply(STARTING_FEN, "e4e5");
        assert_eq!(
            fen,
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1"
        );
    }

    #[test]
    fn test_trailer_is_reset_on_every_move() {
        let fen = apply(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kq e3 12 34",
            "e2e4",
        );
        assert!(fen.ends_with(" b KQkq - 0 1"));
    }

    #[test]
    fn test_side_to_move_parsing() {
        let board_service = BoardService::new();
        assert_eq!(
            board_service.side_to_move(STARTING_FEN).unwrap(),
            PieceColor::White
        );
        assert_eq!(
            board_service
                .side_to_move("8/8/8/8/8/8/8/8 b - - 0 1")
                .unwrap(),
            PieceColor::Black
        );
        assert!(matches!(
            board_service.side_to_move("8/8/8/8/8/8/8/8"),
            Err(BoardServiceError::InvalidPosition(_))
        ));
        assert!(matches!(
            board_service.side_to_move("8/8/8/8/8/8/8/8 x - - 0 1"),
            Err(BoardServiceError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_corrupt_positions_are_rejected() {
        let board_service = BoardService::new();
        let uci_move = UciMove::parse("e2e4").unwrap();

        for fen in [
            "rnbqkbnr/pppppppp w KQkq - 0 1",                       // too few ranks
            "8/8/8/8/8/8/8/8/8 w - - 0 1",                          // too many ranks
            "9/8/8/8/8/8/8/8 w - - 0 1",                            // bad empty count
            "ppppppppp/8/8/8/8/8/8/8 w - - 0 1",                    // nine squares
            "pppp*ppp/8/8/8/8/8/8/8 w - - 0 1",                     // stray character
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPP/RNBQKBNR w - - 0 1", // short rank
        ] {
            let result = board_service.apply_move(fen, &uci_move);
            assert!(
                matches!(result, Err(BoardServiceError::InvalidPosition(_))),
                "expected invalid position for {:?}",
                fen
            );
        }
    }

    proptest! {
        #[test]
        fn prop_in_bounds_moves_always_produce_a_well_formed_position(
            from_file in 0u8..8,
            from_rank in 1u8..=8,
            to_file in 0u8..8,
            to_rank in 1u8..=8,
        ) {
            let uci = format!(
                "{}{}{}{}",
                (b'a' + from_file) as char,
                from_rank,
                (b'a' + to_file) as char,
                to_rank,
            );
            let fen = apply(STARTING_FEN, &uci);

            let placement = fen.split_whitespace().next().unwrap();
            let ranks: Vec<&str> = placement.split('/').collect();
            prop_assert_eq!(ranks.len(), 8);
            for rank in ranks {
                let squares: u32 = rank.chars().map(|c| c.to_digit(10).unwrap_or(1)).sum();
                prop_assert_eq!(squares, 8);
            }
            prop_assert!(fen.ends_with(" b KQkq - 0 1"));
        }
    }
}
