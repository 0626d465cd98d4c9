// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{boundary_notice, canvas_text, draw, footer_line, header_line, App};
use crate::config::BoardConfig;
use crate::model::{Board, CanvasBounds, Node, NodeId, NodeKind, Point, Size};
use crate::render::{Canvas, Paint};
use crate::session::BoardSession;
use crate::view::Mode;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};
use rstest::{fixture, rstest};

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn line_to_string(line: &ratatui::text::Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect::<String>()
}

fn buffer_to_string(buffer: &Buffer) -> String {
    let width = usize::from(buffer.area.width);
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl(ch: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn left_click(app: &mut App, column: u16, row: u16) {
    app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), column, row));
    app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), column, row));
}

fn right_click(app: &mut App, column: u16, row: u16) {
    app.handle_event(mouse(MouseEventKind::Down(MouseButton::Right), column, row));
}

/// Two note cards: `a` at (100, 100) under cell (15, 8) and `b` at (500, 100) under cell (55, 8).
/// Cell (5, 3) is empty canvas at (55, 50).
#[fixture]
fn app() -> App {
    let size = Size::new(200.0, 150.0);
    let board = Board::from_parts(
        vec![
            Node::blank(nid("a"), NodeKind::Note, Point::new(100.0, 100.0), size),
            Node::blank(nid("b"), NodeKind::Note, Point::new(500.0, 100.0), size),
        ],
        vec![],
    );
    let mut app = App::new(BoardSession::in_memory(BoardConfig::default(), board));
    app.board_area = Rect::new(0, 1, 120, 38);
    app
}

fn toast(app: &App) -> String {
    app.toast
        .as_ref()
        .map(|toast| toast.message.clone())
        .unwrap_or_default()
}

#[rstest]
fn right_click_menu_adds_a_node_where_it_opened(mut app: App) {
    right_click(&mut app, 5, 3);
    let menu = app.interaction.context_menu().expect("menu open");
    assert_eq!(menu.canvas(), Point::new(55.0, 50.0));

    app.handle_event(key(KeyCode::Enter));

    let board = app.session.board();
    assert_eq!(board.nodes().len(), 3);
    let added = board.nodes().last().expect("added");
    assert_eq!(added.kind, NodeKind::Note);
    assert_eq!(added.position(), Point::new(55.0, 50.0));
    assert_eq!(app.interaction.selected(), Some(&added.id));
    assert!(app.interaction.context_menu().is_none());
    assert_eq!(app.session.history().len(), 2);
}

#[rstest]
fn menu_items_can_be_chosen_by_digit_or_click(mut app: App) {
    right_click(&mut app, 5, 3);
    app.handle_event(key(KeyCode::Char('4')));
    assert_eq!(app.session.board().nodes().last().map(|n| n.kind), Some(NodeKind::Person));

    right_click(&mut app, 5, 30);
    assert_eq!(app.context_menu_rect(), Some(Rect::new(5, 30, 14, 7)));
    left_click(&mut app, 7, 33);
    let added = app.session.board().nodes().last().expect("added");
    assert_eq!(added.kind, NodeKind::Image);
    assert_eq!(added.size(), Size::new(200.0, 200.0));
}

#[rstest]
fn right_click_on_a_node_does_nothing(mut app: App) {
    right_click(&mut app, 15, 8);
    assert!(app.interaction.context_menu().is_none());
}

#[rstest]
fn placement_outside_the_canvas_shows_the_boundary_notice(mut app: App) {
    app.viewport.pan_by(200.0, 0.0);
    right_click(&mut app, 5, 3);
    app.handle_event(key(KeyCode::Enter));

    assert_eq!(app.session.board().nodes().len(), 2);
    assert_eq!(app.session.history().len(), 1);
    assert_eq!(app.notice.as_deref(), Some(boundary_notice(CanvasBounds::default()).as_str()));

    // The notice swallows input until dismissed.
    left_click(&mut app, 15, 8);
    assert!(app.notice.is_none());
    assert_eq!(app.interaction.mode(), &Mode::Idle);
}

#[rstest]
fn connect_then_click_target_adds_one_connection(mut app: App) {
    left_click(&mut app, 15, 8);
    app.handle_event(key(KeyCode::Char('c')));
    assert_eq!(app.interaction.pending_source(), Some(&nid("a")));

    left_click(&mut app, 55, 8);
    let board = app.session.board();
    assert_eq!(board.connections().len(), 1);
    assert!(board.find_connection(&nid("b"), &nid("a")).is_some());
    assert_eq!(app.interaction.mode(), &Mode::NodeSelected(nid("b")));

    // Reverse direction is the same pair.
    app.handle_event(key(KeyCode::Char('c')));
    left_click(&mut app, 15, 8);
    assert_eq!(app.session.board().connections().len(), 1);
}

#[rstest]
fn second_connect_while_pending_is_rejected(mut app: App) {
    left_click(&mut app, 15, 8);
    app.handle_event(key(KeyCode::Char('c')));
    app.handle_event(key(KeyCode::Char('c')));
    assert!(toast(&app).contains("already connecting"));
    assert_eq!(app.interaction.pending_source(), Some(&nid("a")));
}

#[rstest]
fn connect_without_selection_explains_itself(mut app: App) {
    app.handle_event(key(KeyCode::Char('c')));
    assert!(toast(&app).contains("select a node"));
    assert_eq!(app.interaction.mode(), &Mode::Idle);
}

#[rstest]
fn escape_backs_out_one_level(mut app: App) {
    left_click(&mut app, 15, 8);
    app.handle_event(key(KeyCode::Char('c')));
    app.handle_event(key(KeyCode::Esc));
    assert_eq!(app.interaction.mode(), &Mode::NodeSelected(nid("a")));
    app.handle_event(key(KeyCode::Esc));
    assert_eq!(app.interaction.mode(), &Mode::Idle);
}

#[rstest]
fn dragging_a_node_records_one_snapshot_and_undoes(mut app: App) {
    app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 15, 8));
    app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 20, 8));
    app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 25, 8));
    app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 25, 8));

    let moved = app.session.board().node(&nid("a")).expect("a").position();
    assert_eq!(moved, Point::new(200.0, 100.0));
    assert_eq!(app.session.history().len(), 2);

    app.handle_event(ctrl('z'));
    let restored = app.session.board().node(&nid("a")).expect("a").position();
    assert_eq!(restored, Point::new(100.0, 100.0));

    app.handle_event(Event::Key(KeyEvent::new(
        KeyCode::Char('Z'),
        KeyModifiers::CONTROL | KeyModifiers::SHIFT,
    )));
    let redone = app.session.board().node(&nid("a")).expect("a").position();
    assert_eq!(redone, Point::new(200.0, 100.0));
}

#[rstest]
fn dragging_empty_canvas_pans(mut app: App) {
    app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 5, 3));
    app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 10, 4));
    app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 10, 4));
    assert_eq!(app.viewport.pan(), Point::new(50.0, 20.0));
    assert_eq!(app.session.history().len(), 1);
}

#[rstest]
fn wheel_zoom_is_clamped(mut app: App) {
    for _ in 0..40 {
        app.handle_event(mouse(MouseEventKind::ScrollUp, 5, 3));
    }
    assert_eq!(app.viewport.zoom(), 2.0);
    for _ in 0..60 {
        app.handle_event(mouse(MouseEventKind::ScrollDown, 5, 3));
    }
    assert_eq!(app.viewport.zoom(), 0.25);
    app.handle_event(key(KeyCode::Char('0')));
    assert_eq!(app.viewport.zoom(), 1.0);
}

#[rstest]
fn deleting_the_selection_removes_its_connections(mut app: App) {
    app.session
        .connect(&nid("a"), &nid("b"))
        .expect("connect")
        .expect("new connection");
    left_click(&mut app, 15, 8);
    app.handle_event(key(KeyCode::Delete));

    let board = app.session.board();
    assert_eq!(board.nodes().len(), 1);
    assert!(board.connections().is_empty());
    assert_eq!(app.interaction.mode(), &Mode::Idle);
}

#[rstest]
fn undo_of_an_add_drops_the_stale_selection(mut app: App) {
    right_click(&mut app, 5, 3);
    app.handle_event(key(KeyCode::Enter));
    assert!(app.interaction.selected().is_some());

    app.handle_event(ctrl('z'));
    assert_eq!(app.session.board().nodes().len(), 2);
    assert_eq!(app.interaction.mode(), &Mode::Idle);
}

#[rstest]
fn editor_commits_one_update(mut app: App) {
    left_click(&mut app, 15, 8);
    app.handle_event(key(KeyCode::Char('e')));
    assert!(app.editor.is_some());

    app.handle_event(key(KeyCode::Char('!')));
    app.handle_event(key(KeyCode::Char(' ')));
    app.handle_event(Event::Paste("(lead)\n".to_owned()));
    app.handle_event(key(KeyCode::Enter));

    assert!(app.editor.is_none());
    let node = app.session.board().node(&nid("a")).expect("a");
    assert_eq!(node.data.title, "New note! (lead)");
    assert_eq!(app.session.history().len(), 2);
}

#[rstest]
fn editor_escape_discards(mut app: App) {
    left_click(&mut app, 15, 8);
    app.handle_event(key(KeyCode::Enter));
    app.handle_event(key(KeyCode::Char('x')));
    app.handle_event(key(KeyCode::Esc));
    assert_eq!(app.session.board().node(&nid("a")).expect("a").data.title, "New note");
    assert_eq!(app.session.history().len(), 1);
}

#[rstest]
fn pasting_a_non_image_is_ignored_with_a_notice(mut app: App) {
    app.handle_event(Event::Paste("/tmp/report.pdf".to_owned()));
    assert!(toast(&app).starts_with("Not an image"));
    assert_eq!(app.images.pending(), 0);
    assert_eq!(app.session.board().nodes().len(), 2);
}

#[rstest]
fn dropped_image_lands_at_the_last_pointer_position(mut app: App) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("clue.png");
    std::fs::write(&path, b"png").expect("write");

    app.handle_event(mouse(MouseEventKind::Moved, 5, 3));
    app.handle_event(Event::Paste(format!("'{}'", path.display())));
    assert_eq!(app.images.pending(), 1);

    let result = app.images.wait_one().expect("pending load");
    app.apply_image_result(result);

    let node = app.session.board().nodes().last().expect("image node");
    assert_eq!(node.kind, NodeKind::Image);
    assert_eq!(node.position(), Point::new(55.0, 50.0));
    assert_eq!(node.data.title, "clue.png");
    assert_eq!(node.data.image_url.as_deref(), Some("data:image/png;base64,cG5n"));
    assert_eq!(app.session.history().len(), 2);
}

#[rstest]
fn pasted_image_fills_the_selected_blank_image_node(mut app: App) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("suspect.png");
    std::fs::write(&path, b"png").expect("write");

    right_click(&mut app, 5, 3);
    app.handle_event(key(KeyCode::Char('3')));
    let image_id = app.interaction.selected().cloned().expect("new image selected");
    assert_eq!(app.session.history().len(), 2);

    app.handle_event(Event::Paste(path.display().to_string()));
    let result = app.images.wait_one().expect("pending load");
    app.apply_image_result(result);

    let board = app.session.board();
    assert_eq!(board.nodes().len(), 3);
    let node = board.node(&image_id).expect("image node");
    assert_eq!(node.position(), Point::new(55.0, 50.0));
    assert_eq!(node.data.title, "New image");
    assert_eq!(node.data.image_url.as_deref(), Some("data:image/png;base64,cG5n"));
    assert_eq!(app.session.history().len(), 3);
    assert_eq!(toast(&app), "Image attached");

    // With the picture in place the next paste makes a new node.
    app.handle_event(Event::Paste(path.display().to_string()));
    let result = app.images.wait_one().expect("pending load");
    app.apply_image_result(result);
    assert_eq!(app.session.board().nodes().len(), 4);
}

#[rstest]
fn connections_can_be_labelled_and_removed(mut app: App) {
    app.session
        .connect(&nid("a"), &nid("b"))
        .expect("connect")
        .expect("new connection");
    left_click(&mut app, 15, 8);
    app.handle_event(key(KeyCode::Char('l')));
    assert!(app.connections.is_some());

    app.handle_event(key(KeyCode::Enter));
    for ch in "met".chars() {
        app.handle_event(key(KeyCode::Char(ch)));
    }
    app.handle_event(key(KeyCode::Enter));
    let labels = app
        .session
        .board()
        .connections()
        .iter()
        .map(|conn| conn.label.clone())
        .collect::<Vec<_>>();
    assert_eq!(labels, vec!["met".to_owned()]);
    assert_eq!(app.session.history().len(), 3);

    // Mouse input is ignored while the list is open.
    left_click(&mut app, 5, 3);
    assert_eq!(app.interaction.selected(), Some(&nid("a")));

    app.handle_event(key(KeyCode::Char('d')));
    assert!(app.session.board().connections().is_empty());
    assert!(app.connections.is_none());
    assert_eq!(toast(&app), "Connection removed");

    app.handle_event(ctrl('z'));
    let restored = app.session.board().connections();
    assert_eq!(restored.len(), 1);
    assert_eq!(restored[0].label, "met");
}

#[rstest]
fn connection_list_needs_a_connected_selection(mut app: App) {
    app.handle_event(key(KeyCode::Char('l')));
    assert_eq!(toast(&app), "Select a node first");

    left_click(&mut app, 15, 8);
    app.handle_event(key(KeyCode::Char('l')));
    assert!(app.connections.is_none());
    assert_eq!(toast(&app), "New note has no connections");
}

#[rstest]
fn undo_during_a_drag_abandons_it(mut app: App) {
    app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 15, 8));
    app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 25, 8));
    app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 25, 8));
    assert_eq!(app.session.history().len(), 2);

    app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 25, 8));
    app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 30, 8));
    app.handle_event(ctrl('z'));
    app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 35, 8));
    app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 35, 8));

    let position = app.session.board().node(&nid("a")).expect("a").position();
    assert_eq!(position, Point::new(100.0, 100.0));
    assert_eq!(app.session.history().len(), 2);
    assert!(app.session.can_redo());
    assert_eq!(app.viewport.pan(), Point::new(0.0, 0.0));
}

#[rstest]
fn dropped_image_without_pointer_uses_viewport_centre(app: App) {
    assert_eq!(app.drop_position(), Point::new(600.0, 380.0));
}

#[rstest]
fn header_reports_history_and_zoom(mut app: App) {
    let header = line_to_string(&header_line(&app));
    assert!(header.contains("CASEBOARD"));
    assert!(header.contains("Zoom:100%"));
    assert!(header.contains("Nodes:2"));

    left_click(&mut app, 15, 8);
    app.handle_event(key(KeyCode::Char('c')));
    let header = line_to_string(&header_line(&app));
    assert!(header.contains("connecting from New note"));

    let footer = line_to_string(&footer_line(&app));
    assert!(footer.contains("Connect:c"));
}

#[test]
fn canvas_text_groups_cells_by_paint() {
    let mut canvas = Canvas::new(3, 2).expect("canvas");
    canvas.set(0, 0, 'a', Paint::NodeText).expect("set");
    canvas.set(1, 0, 'b', Paint::NodeText).expect("set");
    canvas.set(0, 1, 'x', Paint::Connection).expect("set");

    let text = canvas_text(&canvas);
    assert_eq!(text.lines.len(), 2);
    assert_eq!(text.lines[0].spans.len(), 2);
    assert_eq!(line_to_string(&text.lines[0]), "ab ");
    assert_eq!(line_to_string(&text.lines[1]), "x  ");
}

#[rstest]
fn draw_renders_board_minimap_and_menu(mut app: App) {
    right_click(&mut app, 5, 3);
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).expect("terminal");
    terminal.draw(|frame| draw(frame, &mut app)).expect("draw");

    let screen = buffer_to_string(terminal.backend().buffer());
    assert!(screen.contains("CASEBOARD"));
    assert!(screen.contains("New note"));
    assert!(screen.contains(" map "));
    assert!(screen.contains(" Add "));
    assert!(screen.contains("location"));
    assert_eq!(app.board_area, Rect::new(0, 1, 120, 38));
}

#[rstest]
fn quit_key_stops_the_loop(mut app: App) {
    app.handle_event(key(KeyCode::Char('q')));
    assert!(app.should_quit);
}
