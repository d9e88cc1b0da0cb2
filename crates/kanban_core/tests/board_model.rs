use kanban_core::{board_from_json, board_to_json, Board, BoardCommand, CommandOutcome};
use proptest::prelude::*;
use uuid::Uuid;

fn column_id(board: &Board, title: &str) -> Uuid {
    board.column_by_title(title).expect("column exists").id
}

#[test]
fn create_card_on_default_board_lands_in_to_do_only() {
    let board = Board::default_board();
    let todo = column_id(&board, "To Do");

    let (board, outcome) = board.apply(&BoardCommand::CreateCard {
        column_id: todo,
        title: "Buy milk".to_string(),
        notes: String::new(),
    });

    let CommandOutcome::CardCreated(card_id) = outcome else {
        panic!("expected a created card, got {outcome:?}");
    };
    assert_eq!(board.card_count(), 1);
    assert_eq!(board.card(card_id).unwrap().title, "Buy milk");
    assert_eq!(board.cards_in(todo).len(), 1);
    assert!(board.cards_in(column_id(&board, "In Progress")).is_empty());
    assert!(board.cards_in(column_id(&board, "Completed")).is_empty());
}

#[test]
fn new_column_then_reorder_yields_exact_order() {
    let mut board = Board::default_board();
    let todo = column_id(&board, "To Do");
    let in_progress = column_id(&board, "In Progress");
    let completed = column_id(&board, "Completed");
    let done = board.create_column("Done").unwrap();

    let wanted = vec![done, todo, in_progress, completed];
    board.reorder_columns(&wanted);

    assert_eq!(board.column_order, wanted);
    let titles: Vec<_> = board
        .ordered_columns()
        .iter()
        .map(|column| column.title.as_str())
        .collect();
    assert_eq!(titles, ["Done", "To Do", "In Progress", "Completed"]);
}

#[test]
fn delete_column_cascades_to_its_cards() {
    let mut board = Board::default_board();
    let todo = column_id(&board, "To Do");
    let doing = column_id(&board, "In Progress");
    let a = board.create_card(todo, "a", "").unwrap();
    let b = board.create_card(todo, "b", "").unwrap();
    let kept = board.create_card(doing, "kept", "").unwrap();

    assert!(board.delete_column(todo));
    assert!(board.card(a).is_none());
    assert!(board.card(b).is_none());
    assert!(board.card(kept).is_some());
    assert!(!board.column_order.contains(&todo));
    assert!(!board.delete_column(todo));
    board.validate().unwrap();
}

#[test]
fn cross_column_move_clamps_index() {
    let mut board = Board::default_board();
    let todo = column_id(&board, "To Do");
    let doing = column_id(&board, "In Progress");
    let first = board.create_card(doing, "first", "").unwrap();
    let moved = board.create_card(todo, "moved", "").unwrap();

    assert!(board.move_card(moved, todo, doing, 7));
    assert_eq!(board.column(doing).unwrap().card_ids, vec![first, moved]);
    assert!(board.column(todo).unwrap().card_ids.is_empty());

    assert!(board.move_card(moved, doing, doing, 0));
    assert_eq!(board.column(doing).unwrap().card_ids, vec![moved, first]);
}

#[derive(Debug, Clone)]
enum Op {
    CreateCard(usize, String, String),
    UpdateCard(usize, String),
    DeleteCard(usize),
    CreateColumn(String),
    UpdateColumn(usize, String),
    DeleteColumn(usize),
    MoveCard(usize, usize, usize, usize),
    Reorder(Vec<usize>),
}

fn title() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ a-z]{0,6}").expect("valid title regex")
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<usize>(), title(), title()).prop_map(|(c, t, n)| Op::CreateCard(c, t, n)),
        1 => (any::<usize>(), title()).prop_map(|(c, t)| Op::UpdateCard(c, t)),
        1 => any::<usize>().prop_map(Op::DeleteCard),
        1 => title().prop_map(Op::CreateColumn),
        1 => (any::<usize>(), title()).prop_map(|(c, t)| Op::UpdateColumn(c, t)),
        1 => any::<usize>().prop_map(Op::DeleteColumn),
        3 => (any::<usize>(), any::<usize>(), any::<usize>(), 0usize..8)
            .prop_map(|(c, f, t, i)| Op::MoveCard(c, f, t, i)),
        1 => prop::collection::vec(any::<usize>(), 0..6).prop_map(Op::Reorder),
    ]
}

fn pick<T: Copy>(items: &[T], seed: usize) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[seed % items.len()])
    }
}

fn card_ids(board: &Board) -> Vec<Uuid> {
    board.cards.keys().copied().collect()
}

fn resolve(board: &Board, op: &Op) -> BoardCommand {
    let column = |seed| pick(&board.column_order, seed).unwrap_or_else(Uuid::new_v4);
    let card = |seed| pick(&card_ids(board), seed).unwrap_or_else(Uuid::new_v4);
    match op {
        Op::CreateCard(c, t, n) => BoardCommand::CreateCard {
            column_id: column(*c),
            title: t.clone(),
            notes: n.clone(),
        },
        Op::UpdateCard(c, t) => BoardCommand::UpdateCard {
            card_id: card(*c),
            title: t.clone(),
            notes: String::new(),
        },
        Op::DeleteCard(c) => BoardCommand::DeleteCard { card_id: card(*c) },
        Op::CreateColumn(t) => BoardCommand::CreateColumn { title: t.clone() },
        Op::UpdateColumn(c, t) => BoardCommand::UpdateColumn {
            column_id: column(*c),
            title: t.clone(),
        },
        Op::DeleteColumn(c) => BoardCommand::DeleteColumn {
            column_id: column(*c),
        },
        Op::MoveCard(c, f, t, i) => BoardCommand::MoveCard {
            card_id: card(*c),
            from_column_id: column(*f),
            to_column_id: column(*t),
            target_index: *i,
        },
        Op::Reorder(seeds) => BoardCommand::ReorderColumns {
            column_ids: seeds.iter().map(|seed| column(*seed)).collect(),
        },
    }
}

fn arbitrary_board() -> impl Strategy<Value = Board> {
    prop::collection::vec(op(), 0..40).prop_map(|ops| {
        let mut board = Board::default_board();
        for op in &ops {
            let command = resolve(&board, op);
            board.apply_in_place(&command);
        }
        board
    })
}

proptest! {
    #[test]
    fn every_mutation_preserves_invariants(ops in prop::collection::vec(op(), 0..60)) {
        let mut board = Board::default_board();
        for op in &ops {
            let command = resolve(&board, op);
            let (next, outcome) = board.apply(&command);
            prop_assert!(next.validate().is_ok(), "{command:?} broke {:?}", next.validate());
            if outcome.is_ignored() {
                prop_assert_eq!(&next, &board);
            }
            board = next;
        }
    }

    #[test]
    fn delete_column_removes_column_and_its_cards(board in arbitrary_board(), seed in any::<usize>()) {
        let Some(target) = pick(&board.column_order, seed) else {
            return Ok(());
        };
        let former = board.column(target).unwrap().card_ids.clone();

        let (next, outcome) = board.apply(&BoardCommand::DeleteColumn { column_id: target });
        prop_assert_eq!(outcome, CommandOutcome::Applied);
        prop_assert!(!next.column_order.contains(&target));
        prop_assert!(next.column(target).is_none());
        for card_id in former {
            prop_assert!(next.card(card_id).is_none());
        }
    }

    #[test]
    fn moved_card_ends_in_exactly_the_destination(
        board in arbitrary_board(),
        seeds in (any::<usize>(), any::<usize>(), any::<usize>()),
        index in 0usize..10,
    ) {
        let (Some(card_id), Some(from), Some(to)) = (
            pick(&card_ids(&board), seeds.0),
            pick(&board.column_order, seeds.1),
            pick(&board.column_order, seeds.2),
        ) else {
            return Ok(());
        };

        let (next, outcome) = board.apply(&BoardCommand::MoveCard {
            card_id,
            from_column_id: from,
            to_column_id: to,
            target_index: index,
        });
        prop_assert_eq!(outcome, CommandOutcome::Applied);
        let holders: Vec<_> = next
            .columns
            .iter()
            .filter(|column| column.card_ids.contains(&card_id))
            .map(|column| column.id)
            .collect();
        prop_assert_eq!(holders, vec![to]);
    }

    #[test]
    fn blank_title_create_card_is_noop(
        board in arbitrary_board(),
        blank in "[ \t]{0,4}",
        seed in any::<usize>(),
    ) {
        let column_id = pick(&board.column_order, seed).unwrap_or_else(Uuid::new_v4);
        let (next, outcome) = board.apply(&BoardCommand::CreateCard {
            column_id,
            title: blank,
            notes: "ignored".to_string(),
        });
        prop_assert!(outcome.is_ignored());
        prop_assert_eq!(next, board);
    }

    #[test]
    fn json_round_trip_is_identity(board in arbitrary_board()) {
        let json = board_to_json(&board).unwrap();
        prop_assert_eq!(board_from_json(&json).unwrap(), board);
    }
}
