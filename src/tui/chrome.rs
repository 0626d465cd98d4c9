// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Header, footer, overlay, and style helpers used by TUI rendering.
fn paint_style(paint: Paint) -> Style {
    match paint {
        Paint::Blank => Style::default(),
        Paint::Boundary => Style::default().fg(Color::DarkGray),
        Paint::Connection => Style::default().fg(CONNECTION_COLOR),
        Paint::ConnectionLabel => Style::default()
            .fg(Color::LightRed)
            .add_modifier(Modifier::ITALIC),
        Paint::NodeBorder(kind) => Style::default().fg(kind_color(kind)),
        Paint::NodeText => Style::default().fg(Color::White),
        Paint::Selected => Style::default().fg(SELECTED_COLOR).add_modifier(Modifier::BOLD),
        Paint::Pending => Style::default().fg(PENDING_COLOR).add_modifier(Modifier::BOLD),
        Paint::MinimapNode => Style::default().fg(Color::Gray),
        Paint::MinimapViewport => Style::default().fg(SELECTED_COLOR),
    }
}

fn kind_color(kind: NodeKind) -> Color {
    match kind {
        NodeKind::Note => Color::Yellow,
        NodeKind::Link => Color::LightBlue,
        NodeKind::Image => Color::Magenta,
        NodeKind::Person => Color::Green,
        NodeKind::Location => Color::Cyan,
    }
}

/// Converts a painted canvas into styled lines, one span per run of equal paint.
fn canvas_text(canvas: &Canvas) -> Text<'static> {
    fn flush(spans: &mut Vec<Span<'static>>, run: &mut String, paint: Paint) {
        if !run.is_empty() {
            spans.push(Span::styled(std::mem::take(run), paint_style(paint)));
        }
    }

    let mut lines = Vec::<Line<'static>>::with_capacity(canvas.height());
    let mut spans = Vec::<Span<'static>>::new();
    let mut run = String::new();
    let mut run_paint = Paint::Blank;

    canvas.for_each_cell(|x, y, ch, paint| {
        if x == 0 && y > 0 {
            flush(&mut spans, &mut run, run_paint);
            lines.push(Line::from(std::mem::take(&mut spans)));
        }
        if paint != run_paint {
            flush(&mut spans, &mut run, run_paint);
            run_paint = paint;
        }
        run.push(ch);
    });
    flush(&mut spans, &mut run, run_paint);
    if canvas.height() > 0 {
        lines.push(Line::from(spans));
    }

    Text::from(lines)
}

fn header_line(app: &App) -> Line<'static> {
    let mut spans = vec![Span::styled(
        HEADER_BRAND.to_owned(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];
    push_footer_entry_maybe_disabled(&mut spans, "UNDO", "^Z", !app.session.can_undo());
    push_footer_entry_maybe_disabled(&mut spans, "REDO", "^Y", !app.session.can_redo());
    push_footer_entry(
        &mut spans,
        "ZOOM",
        &format!("{}%", (app.viewport.zoom() * 100.0).round() as i64),
    );
    push_footer_entry(
        &mut spans,
        "NODES",
        &app.session.board().nodes().len().to_string(),
    );

    if let Some(source) = app.interaction.pending_source() {
        spans.push(Span::styled(
            format!("  connecting from {}", node_title(app, source)),
            Style::default().fg(PENDING_COLOR).add_modifier(Modifier::BOLD),
        ));
    }

    Line::from(spans)
}

fn footer_line(app: &App) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    let has_selection = app.interaction.selected().is_some();

    push_footer_entry(&mut spans, "ADD", "a/right-click");
    push_footer_entry_maybe_disabled(&mut spans, "CONNECT", "c", !has_selection);
    push_footer_entry_maybe_disabled(&mut spans, "EDIT", "e", !has_selection);
    push_footer_entry_maybe_disabled(&mut spans, "DELETE", "d", !has_selection);
    push_footer_entry_maybe_disabled(&mut spans, "LINKS", "l", !has_selection);
    push_footer_entry(&mut spans, "HELP", "?");
    push_footer_entry(&mut spans, "QUIT", "q");

    if let Some(toast) = app.toast.as_ref() {
        spans.push(Span::styled(
            " | ".to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
        spans.push(Span::raw(toast.message.clone()));
    }

    Line::from(spans)
}

fn node_title(app: &App, node_id: &NodeId) -> String {
    app.session
        .board()
        .node(node_id)
        .map(|node| node.data.title.clone())
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| node_id.to_string())
}

fn boundary_notice(bounds: CanvasBounds) -> String {
    format!(
        "Nodes can only be placed inside the {} x {} canvas.",
        bounds.width, bounds.height
    )
}

fn help_key_style() -> Style {
    Style::default()
        .fg(FOOTER_KEY_COLOR)
        .add_modifier(Modifier::BOLD)
}

fn help_header_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

/// A `width` x `height` box centred in `area`, shrunk to fit.
fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

const HELP_KEYS: &[(&str, &str)] = &[
    ("left-drag", "Move a node, or pan on empty canvas"),
    ("click", "Select a node; clears selection on empty canvas"),
    ("right-click", "Add a node at the pointer (empty canvas only)"),
    ("wheel, +/-", "Zoom in/out"),
    ("arrows", "Pan"),
    ("0", "Reset pan and zoom"),
    ("a", "Add a node at the pointer"),
    ("c", "Connect the selected node; then click the other end"),
    ("e/Enter", "Edit the selected node"),
    ("d/Delete", "Delete the selected node and its connections"),
    ("l", "Label or remove the selected node's connections"),
    ("Ctrl-Z", "Undo"),
    ("Ctrl-Y, Ctrl-Shift-Z", "Redo"),
    ("Esc", "Close menu, cancel connection, clear selection"),
    ("paste a path", "Drop an image file at the pointer"),
    ("?", "Help (toggle)"),
    ("q", "Quit"),
];

fn render_help(frame: &mut Frame<'_>, area: Rect) {
    let area = centered_rect(70, 80, area);
    frame.render_widget(Clear, area);

    let key_style = help_key_style();
    let key_col_width = HELP_KEYS
        .iter()
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = vec![Line::from(Span::styled("--- Board ---", help_header_style()))];
    lines.extend(
        HELP_KEYS
            .iter()
            .map(|(key, desc)| help_kv(key, desc, key_col_width, key_style)),
    );

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_notice(frame: &mut Frame<'_>, message: &str, area: Rect) {
    let area = centered_box(48, 6, area);
    frame.render_widget(Clear, area);
    let text = Text::from(vec![
        Line::from(message.to_owned()),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key or click to continue.",
            Style::default().fg(FOOTER_LABEL_COLOR),
        )),
    ]);
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightRed))
                .title(" Outside the board "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_editor(frame: &mut Frame<'_>, editor: &NodeEditor, area: Rect) {
    let height = u16::try_from(editor.fields().len()).unwrap_or(u16::MAX).saturating_add(4);
    let area = centered_box(60, height, area);
    frame.render_widget(Clear, area);

    let label_width = editor
        .fields()
        .iter()
        .map(|field| field.field.label().len())
        .max()
        .unwrap_or(0);
    let mut lines = editor
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let focused = idx == editor.focus();
            let label_style = if focused {
                help_key_style()
            } else {
                Style::default().fg(FOOTER_LABEL_COLOR)
            };
            let mut spans = vec![
                Span::styled(
                    format!("{:>width$} ", field.field.label(), width = label_width),
                    label_style,
                ),
                Span::raw(field.value.clone()),
            ];
            if focused {
                spans.push(Span::styled("▏", Style::default().fg(SELECTED_COLOR)));
            }
            Line::from(spans)
        })
        .collect::<Vec<_>>();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab next field | Enter save | Esc discard",
        Style::default().fg(FOOTER_LABEL_COLOR),
    )));

    let paragraph = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(kind_color(editor.kind())))
            .title(format!(" Edit {} ", editor.kind())),
    );
    frame.render_widget(paragraph, area);
}

fn render_connections(frame: &mut Frame<'_>, app: &App, links: &ConnectionEditor, area: Rect) {
    let height = u16::try_from(links.rows().len())
        .unwrap_or(u16::MAX)
        .saturating_add(4);
    let area = centered_box(60, height, area);
    frame.render_widget(Clear, area);

    let other_width = links
        .rows()
        .iter()
        .map(|row| row.other.chars().count())
        .max()
        .unwrap_or(0);
    let mut lines = links
        .rows()
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let focused = idx == links.focus();
            let name_style = if focused {
                help_key_style()
            } else {
                Style::default().fg(FOOTER_LABEL_COLOR)
            };
            let mut spans = vec![Span::styled(
                format!("{:<width$}  ", row.other, width = other_width),
                name_style,
            )];
            match links.draft().filter(|_| focused) {
                Some(draft) => {
                    spans.push(Span::raw(draft.to_owned()));
                    spans.push(Span::styled("▏", Style::default().fg(SELECTED_COLOR)));
                }
                None => spans.push(Span::styled(
                    row.label.clone(),
                    paint_style(Paint::ConnectionLabel),
                )),
            }
            Line::from(spans)
        })
        .collect::<Vec<_>>();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter label | d remove | Esc close",
        Style::default().fg(FOOTER_LABEL_COLOR),
    )));

    let title = node_title(app, links.node_id());
    let paragraph = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(CONNECTION_COLOR))
            .title(format!(" Connections of {title} ")),
    );
    frame.render_widget(paragraph, area);
}

fn render_context_menu(frame: &mut Frame<'_>, menu: &ContextMenu, area: Rect) {
    frame.render_widget(Clear, area);
    let items = menu
        .items()
        .iter()
        .enumerate()
        .map(|(idx, kind)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", idx + 1), help_key_style()),
                Span::styled(kind.to_string(), Style::default().fg(kind_color(*kind))),
            ]))
        })
        .collect::<Vec<_>>();
    let mut state = ListState::default().with_selected(Some(menu.selected_index()));
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Add "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, area, &mut state);
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    push_footer_entry_maybe_disabled(spans, label, value, false);
}

fn push_footer_entry_maybe_disabled(
    spans: &mut Vec<Span<'static>>,
    label: &str,
    value: &str,
    disabled: bool,
) {
    if !spans.is_empty() {
        spans.push(Span::styled(
            " | ".to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.push(footer_value_span(value, disabled));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}

fn footer_value_span(value: &str, disabled: bool) -> Span<'static> {
    let color = if disabled {
        Color::DarkGray
    } else {
        FOOTER_KEY_COLOR
    };
    Span::styled(
        value.to_owned(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}
