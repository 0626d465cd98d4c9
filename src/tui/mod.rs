// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Provides the interactive board shell (ratatui + crossterm). Pointer input comes from terminal
//! mouse reporting; a bracketed paste of a file path counts as an image drop.

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste,
        EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use tracing::{debug, info, warn};

use crate::media::{parse_dropped_path, ImageLoadError, ImageLoader, ImageTarget, LoadedImage};
use crate::model::{CanvasBounds, ConnectionId, DataField, NodeId, NodeKind, Point, Size};
use crate::ops::{ApplyError, NodeDataPatch, NodePatch};
use crate::render::{minimap_cells, render_board, render_minimap, BoardScene, Canvas, Paint};
use crate::session::BoardSession;
use crate::view::{
    CellMetrics, ContextMenu, Interaction, PointerAction, Viewport, WheelDirection, ZoomLimits,
};

mod connections;
mod editor;

use connections::{ConnectionEditor, ConnectionOutcome};
use editor::{EditorOutcome, NodeEditor};

const SELECTED_COLOR: Color = Color::LightGreen;
const PENDING_COLOR: Color = Color::LightBlue;
const CONNECTION_COLOR: Color = Color::Red;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const HEADER_BRAND: &str = " CASEBOARD ";
const TICK: Duration = Duration::from_millis(100);
const TOAST_TTL: Duration = Duration::from_secs(3);
const PAN_STEP_CELLS: f64 = 4.0;
const MENU_WIDTH: u16 = 14;

/// Runs the interactive terminal UI until the user quits.
pub fn run(session: BoardSession) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(session);
    info!("ui started");

    while !app.should_quit {
        app.tick();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(TICK)? {
            app.handle_event(event::read()?);
        }
    }

    info!(pending_images = app.images.pending(), "ui stopped");
    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());
    let header_area = layout[0];
    let board_area = layout[1];
    let footer_area = layout[2];
    app.board_area = board_area;

    frame.render_widget(Paragraph::new(header_line(app)), header_area);
    draw_board(frame, app, board_area);
    draw_minimap(frame, app, board_area);

    if let (Some(menu), Some(menu_area)) =
        (app.interaction.context_menu(), app.context_menu_rect())
    {
        render_context_menu(frame, menu, menu_area);
    }

    app.expire_toast();
    frame.render_widget(Paragraph::new(footer_line(app)), footer_area);

    if let Some(editor) = app.editor.as_ref() {
        render_editor(frame, editor, board_area);
    }
    if let Some(links) = app.connections.as_ref() {
        render_connections(frame, app, links, board_area);
    }
    if app.show_help {
        render_help(frame, board_area);
    }
    if let Some(notice) = app.notice.as_deref() {
        render_notice(frame, notice, board_area);
    }
}

fn draw_board(frame: &mut Frame<'_>, app: &App, area: Rect) {
    if area.is_empty() {
        return;
    }
    let scene = BoardScene {
        board: app.session.board(),
        viewport: &app.viewport,
        cells: app.cells,
        bounds: app.session.bounds(),
        selected: app.interaction.selected(),
        pending: app.interaction.pending_source(),
    };
    match render_board(&scene, usize::from(area.width), usize::from(area.height)) {
        Ok(rendered) => frame.render_widget(Paragraph::new(canvas_text(&rendered.canvas)), area),
        Err(err) => debug!(error = %err, "board render skipped"),
    }
}

fn draw_minimap(frame: &mut Frame<'_>, app: &App, board_area: Rect) {
    let Some(area) = app.minimap_rect() else {
        return;
    };
    let inner = Rect::new(
        area.x + 1,
        area.y + 1,
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    );
    let minimap = render_minimap(
        app.session.board(),
        app.session.bounds(),
        &app.viewport,
        app.cells.screen_size(board_area.width, board_area.height),
        app.interaction.selected(),
        usize::from(inner.width),
        usize::from(inner.height),
    );
    match minimap {
        Ok(canvas) => {
            frame.render_widget(Clear, area);
            frame.render_widget(
                Paragraph::new(canvas_text(&canvas)).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::DarkGray))
                        .title(" map "),
                ),
                area,
            );
        }
        Err(err) => debug!(error = %err, "minimap render skipped"),
    }
}

// Extracted header/footer/overlay rendering helpers.
include!("chrome.rs");

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

/// Key handling outcome while the add-node menu is open.
enum MenuKey {
    Ignored,
    Choose(NodeKind),
    Close,
    Quit,
}

struct App {
    session: BoardSession,
    viewport: Viewport,
    cells: CellMetrics,
    interaction: Interaction,
    images: ImageLoader,
    editor: Option<NodeEditor>,
    connections: Option<ConnectionEditor>,
    /// Boundary notice; blocks other input until dismissed.
    notice: Option<String>,
    toast: Option<Toast>,
    show_help: bool,
    /// Terminal area the board was last drawn into. Mouse positions are relative to it.
    board_area: Rect,
    should_quit: bool,
}

impl App {
    fn new(session: BoardSession) -> Self {
        let viewport = Viewport::new(ZoomLimits::from(&session.config().zoom));
        let cells = CellMetrics::from(&session.config().display);
        Self {
            session,
            viewport,
            cells,
            interaction: Interaction::new(),
            images: ImageLoader::new(),
            editor: None,
            connections: None,
            notice: None,
            toast: None,
            show_help: false,
            board_area: Rect::default(),
            should_quit: false,
        }
    }

    /// Work done once per loop iteration before drawing.
    fn tick(&mut self) {
        for result in self.images.drain() {
            self.apply_image_result(result);
        }
        if let Some(err) = self.session.take_save_error() {
            self.set_toast(format!("Save failed: {err}"));
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Paste(text) => self.handle_paste(&text),
            _ => {}
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn expire_toast(&mut self) {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= Instant::now())
        {
            self.toast = None;
        }
    }

    fn board_screen_size(&self) -> Size {
        self.cells
            .screen_size(self.board_area.width, self.board_area.height)
    }

    fn in_board(&self, column: u16, row: u16) -> bool {
        self.board_area.contains(Position::new(column, row))
    }

    /// Screen point at the centre of a terminal cell, relative to the board area.
    fn screen_point(&self, column: u16, row: u16) -> Point {
        self.cells.cell_center(
            column.saturating_sub(self.board_area.x),
            row.saturating_sub(self.board_area.y),
        )
    }

    fn context_menu_rect(&self) -> Option<Rect> {
        let menu = self.interaction.context_menu()?;
        let area = self.board_area;
        if area.is_empty() {
            return None;
        }
        let width = MENU_WIDTH.min(area.width);
        let height = u16::try_from(menu.items().len() + 2)
            .unwrap_or(u16::MAX)
            .min(area.height);
        let (col, row) = self.cells.cell_of(menu.screen());
        let x = (i64::from(area.x) + col).clamp(
            i64::from(area.x),
            i64::from(area.right().saturating_sub(width)),
        );
        let y = (i64::from(area.y) + row).clamp(
            i64::from(area.y),
            i64::from(area.bottom().saturating_sub(height)),
        );
        Some(Rect::new(
            u16::try_from(x).ok()?,
            u16::try_from(y).ok()?,
            width,
            height,
        ))
    }

    /// Bottom-right overlay, hidden when the board area is too small to fit it.
    fn minimap_rect(&self) -> Option<Rect> {
        let display = &self.session.config().display;
        let (cols, rows) = minimap_cells(
            Size::new(display.minimap_width, display.minimap_height),
            self.cells,
        );
        let width = u16::try_from(cols + 2).ok()?;
        let height = u16::try_from(rows + 2).ok()?;
        let area = self.board_area;
        if area.width < width.saturating_mul(2) || area.height <= height {
            return None;
        }
        Some(Rect::new(
            area.right() - width,
            area.bottom() - height,
            width,
            height,
        ))
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.notice.take().is_some() {
            return;
        }

        if let Some(editor) = self.editor.as_mut() {
            let outcome = editor.handle_key(key);
            let node_id = editor.node_id().clone();
            match outcome {
                EditorOutcome::Editing => {}
                EditorOutcome::Cancel => self.editor = None,
                EditorOutcome::Commit(patch) => {
                    self.editor = None;
                    self.commit_edit(&node_id, patch);
                }
            }
            return;
        }

        if let Some(links) = self.connections.as_mut() {
            match links.handle_key(key) {
                ConnectionOutcome::Browsing => {}
                ConnectionOutcome::Close => self.connections = None,
                ConnectionOutcome::SetLabel {
                    connection_id,
                    label,
                } => self.label_connection(&connection_id, label),
                ConnectionOutcome::Remove(connection_id) => self.remove_connection(&connection_id),
            }
            return;
        }

        if self.show_help {
            match key.code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        if self.interaction.context_menu().is_some() {
            self.handle_menu_key(key);
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let pan_step_x = PAN_STEP_CELLS * self.cells.cell_width;
        let pan_step_y = PAN_STEP_CELLS * self.cells.cell_height;
        match key.code {
            KeyCode::Char('z') if ctrl && !shift => self.undo(),
            KeyCode::Char('z' | 'Z') if ctrl => self.redo(),
            KeyCode::Char('y' | 'Y') if ctrl => self.redo(),
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('a') => self.open_menu_at_pointer(),
            KeyCode::Char('c') => self.begin_connect(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('e') | KeyCode::Enter => self.edit_selected(),
            KeyCode::Char('l') => self.open_connections(),
            KeyCode::Esc => self.interaction.cancel(),
            KeyCode::Left => self.viewport.pan_by(pan_step_x, 0.0),
            KeyCode::Right => self.viewport.pan_by(-pan_step_x, 0.0),
            KeyCode::Up => self.viewport.pan_by(0.0, pan_step_y),
            KeyCode::Down => self.viewport.pan_by(0.0, -pan_step_y),
            KeyCode::Char('+' | '=') => {
                self.viewport.wheel(WheelDirection::Up);
            }
            KeyCode::Char('-') => {
                self.viewport.wheel(WheelDirection::Down);
            }
            KeyCode::Char('0') => self.viewport.reset(),
            _ => {}
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        let outcome = match self.interaction.context_menu_mut() {
            None => MenuKey::Ignored,
            Some(menu) => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    menu.select_prev();
                    MenuKey::Ignored
                }
                KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                    menu.select_next();
                    MenuKey::Ignored
                }
                KeyCode::Enter => MenuKey::Choose(menu.selected_kind()),
                KeyCode::Char(ch @ '1'..='9') => ch
                    .to_digit(10)
                    .and_then(|digit| usize::try_from(digit).ok())
                    .and_then(|digit| menu.select(digit - 1))
                    .map_or(MenuKey::Ignored, MenuKey::Choose),
                KeyCode::Esc => MenuKey::Close,
                KeyCode::Char('q') => MenuKey::Quit,
                _ => MenuKey::Ignored,
            },
        };

        match outcome {
            MenuKey::Ignored => {}
            MenuKey::Choose(kind) => self.add_from_menu(kind),
            MenuKey::Close => {
                self.interaction.close_context_menu();
            }
            MenuKey::Quit => self.should_quit = true,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.notice.is_some() {
            if matches!(mouse.kind, MouseEventKind::Down(_)) {
                self.notice = None;
            }
            return;
        }
        if self.editor.is_some() || self.connections.is_some() || self.show_help {
            return;
        }

        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.left_press(column, row),
            MouseEventKind::Down(MouseButton::Right) if self.in_board(column, row) => {
                let screen = self.screen_point(column, row);
                if !self
                    .interaction
                    .open_context_menu(screen, self.session.board(), &self.viewport)
                {
                    debug!("context menu suppressed over a node");
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let screen = self.screen_point(column, row);
                if let Some((node_id, position)) =
                    self.interaction.drag_to(screen, &mut self.viewport)
                {
                    if let Err(err) = self.session.drag_node(&node_id, position) {
                        debug!(node_id = %node_id, error = %err, "drag step rejected");
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(end) = self.interaction.release() {
                    self.session.finish_drag(&end.node_id, end.origin);
                }
            }
            MouseEventKind::Moved if self.in_board(column, row) => {
                let screen = self.screen_point(column, row);
                self.interaction.track_pointer(screen, &self.viewport);
            }
            MouseEventKind::ScrollUp => {
                self.viewport.wheel(WheelDirection::Up);
            }
            MouseEventKind::ScrollDown => {
                self.viewport.wheel(WheelDirection::Down);
            }
            _ => {}
        }
    }

    fn left_press(&mut self, column: u16, row: u16) {
        if let Some(menu_area) = self.context_menu_rect() {
            if menu_area.contains(Position::new(column, row)) {
                let index = usize::from(row.saturating_sub(menu_area.y));
                let chosen = index.checked_sub(1).and_then(|index| {
                    self.interaction
                        .context_menu_mut()
                        .and_then(|menu| menu.select(index))
                });
                if let Some(kind) = chosen {
                    self.add_from_menu(kind);
                }
                return;
            }
        }
        if !self.in_board(column, row) {
            return;
        }

        let screen = self.screen_point(column, row);
        let action = self
            .interaction
            .press(screen, self.session.board(), &self.viewport);
        if let PointerAction::Connect { from, to } = action {
            match self.session.connect(&from, &to) {
                Ok(Some(_)) => self.set_toast("Connected"),
                Ok(None) => {}
                Err(err) => self.report_apply_error(err),
            }
        }
    }

    fn handle_paste(&mut self, text: &str) {
        if let Some(editor) = self.editor.as_mut() {
            editor.paste(text);
            return;
        }
        if let Some(links) = self.connections.as_mut() {
            links.paste(text);
            return;
        }
        if self.notice.is_some() || self.show_help {
            return;
        }

        let Some(path) = parse_dropped_path(text) else {
            self.set_toast("Paste an image file path to drop it on the board");
            return;
        };
        let target = self.image_target();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        match self.images.request(path, target) {
            Ok(()) => self.set_toast(format!("Loading {name}")),
            Err(ImageLoadError::NotAnImage { path }) => {
                debug!(path = %path.display(), "ignored non-image drop");
                self.set_toast(format!("Not an image: {}", path.display()));
            }
            Err(err) => {
                warn!(error = %err, "image load failed to start");
                self.set_toast(err.to_string());
            }
        }
    }

    /// A selected image node without a picture receives the drop. Anything else gets a new node.
    fn image_target(&self) -> ImageTarget {
        let blank_image = self
            .interaction
            .selected()
            .and_then(|node_id| self.session.board().node(node_id))
            .filter(|node| {
                node.kind == NodeKind::Image
                    && node.data.image_url.as_deref().map_or(true, str::is_empty)
            });
        match blank_image {
            Some(node) => ImageTarget::Node(node.id.clone()),
            None => ImageTarget::NewNode(self.drop_position()),
        }
    }

    /// Canvas point for dropped images: the last pointer position, else the viewport centre.
    fn drop_position(&self) -> Point {
        self.interaction
            .last_pointer()
            .unwrap_or_else(|| self.viewport.center_of(self.board_screen_size()))
    }

    fn apply_image_result(&mut self, result: Result<LoadedImage, ImageLoadError>) {
        let image = match result {
            Ok(image) => image,
            Err(err) => {
                warn!(error = %err, "image load failed");
                self.set_toast(err.to_string());
                return;
            }
        };
        let path = image.path.display().to_string();
        match image.target {
            ImageTarget::NewNode(at) => {
                match self.session.add_image_node(image.title, image.data_url, at) {
                    Ok(_) => {
                        info!(path = %path, "image dropped");
                        self.set_toast("Image added");
                    }
                    Err(err) => self.report_apply_error(err),
                }
            }
            ImageTarget::Node(node_id) => {
                let patch = NodeDataPatch::default().with(DataField::ImageUrl, image.data_url);
                match self.session.update_node(&node_id, NodePatch::data(patch)) {
                    Ok(_) => {
                        info!(path = %path, node_id = %node_id, "image attached");
                        self.set_toast("Image attached");
                    }
                    Err(err) => self.report_apply_error(err),
                }
            }
        }
    }

    fn report_apply_error(&mut self, err: ApplyError) {
        if err.is_out_of_bounds() {
            debug!(error = %err, "placement rejected");
            self.notice = Some(boundary_notice(self.session.bounds()));
        } else {
            warn!(error = %err, "board change rejected");
            self.set_toast(err.to_string());
        }
    }

    fn open_menu_at_pointer(&mut self) {
        let canvas = self.drop_position();
        let screen = self.viewport.canvas_to_screen(canvas);
        if !self
            .interaction
            .open_context_menu(screen, self.session.board(), &self.viewport)
        {
            self.set_toast("Move the pointer off the node to add one");
        }
    }

    fn add_from_menu(&mut self, kind: NodeKind) {
        let Some(menu) = self.interaction.close_context_menu() else {
            return;
        };
        match self.session.add_node(kind, menu.canvas()) {
            Ok(node_id) => self.interaction.select(node_id),
            Err(err) => self.report_apply_error(err),
        }
    }

    fn begin_connect(&mut self) {
        match self.interaction.begin_connect() {
            Ok(source) => {
                let title = node_title(self, &source);
                self.set_toast(format!("Connecting from {title}: click the other node"));
            }
            Err(err) => self.set_toast(err.to_string()),
        }
    }

    fn delete_selected(&mut self) {
        let Some(node_id) = self.interaction.selected().cloned() else {
            self.set_toast("Select a node first");
            return;
        };
        match self.session.delete_node(&node_id) {
            Ok(()) => {
                self.interaction.forget_node(&node_id);
                self.set_toast("Node deleted");
            }
            Err(err) => self.report_apply_error(err),
        }
    }

    fn edit_selected(&mut self) {
        let Some(node) = self
            .interaction
            .selected()
            .and_then(|node_id| self.session.board().node(node_id))
        else {
            self.set_toast("Select a node first");
            return;
        };
        self.editor = Some(NodeEditor::open(node));
    }

    fn commit_edit(&mut self, node_id: &NodeId, patch: NodeDataPatch) {
        if patch.is_empty() {
            return;
        }
        match self.session.update_node(node_id, NodePatch::data(patch)) {
            Ok(true) => self.set_toast("Saved"),
            Ok(false) => {}
            Err(err) => self.report_apply_error(err),
        }
    }

    fn open_connections(&mut self) {
        let Some(node_id) = self.interaction.selected().cloned() else {
            self.set_toast("Select a node first");
            return;
        };
        self.connections = ConnectionEditor::open(self.session.board(), &node_id);
        if self.connections.is_none() {
            let title = node_title(self, &node_id);
            self.set_toast(format!("{title} has no connections"));
        }
    }

    fn label_connection(&mut self, connection_id: &ConnectionId, label: Option<String>) {
        match self.session.set_connection_label(connection_id, label) {
            Ok(true) => self.set_toast("Label saved"),
            Ok(false) => {}
            Err(err) => self.report_apply_error(err),
        }
        self.refresh_connections();
    }

    fn remove_connection(&mut self, connection_id: &ConnectionId) {
        match self.session.remove_connection(connection_id) {
            Ok(()) => self.set_toast("Connection removed"),
            Err(err) => self.report_apply_error(err),
        }
        self.refresh_connections();
    }

    fn refresh_connections(&mut self) {
        let keep = match self.connections.as_mut() {
            Some(links) => links.refresh(self.session.board()),
            None => return,
        };
        if !keep {
            self.connections = None;
        }
    }

    fn undo(&mut self) {
        if self.session.undo() {
            self.interaction.snapshot_restored(self.session.board());
            self.set_toast("Undo");
        } else {
            self.set_toast("Nothing to undo");
        }
    }

    fn redo(&mut self) {
        if self.session.redo() {
            self.interaction.snapshot_restored(self.session.board());
            self.set_toast("Redo");
        } else {
            self.set_toast("Nothing to redo");
        }
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste
        )
        .map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    );
}

#[cfg(test)]
mod tests;
