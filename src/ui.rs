use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{Component, EventKind, HandlerResponse};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use crate::action::Action;
use crate::sprite;
use crate::state::{AppState, PokemonRecord, Screen};
use crate::theme;

const BG_BASE: Color = Color::Rgb(16, 16, 22);
const BG_PANEL: Color = Color::Rgb(28, 28, 38);
const BG_HIGHLIGHT: Color = Color::Rgb(70, 52, 52);
const TEXT_MAIN: Color = Color::Rgb(236, 234, 228);
const TEXT_DIM: Color = Color::Rgb(160, 158, 168);
const ACCENT_RED: Color = Color::Rgb(214, 80, 70);
const BADGE_TEXT: Color = Color::Rgb(24, 24, 30);

/// Panel areas reported back so the event bus can route mouse events.
pub struct ScreenAreas {
    pub list: Rect,
    pub detail: Rect,
    pub search: Rect,
}

pub struct DexUi {
    list: SelectList,
    status_bar: StatusBar,
}

impl Default for DexUi {
    fn default() -> Self {
        Self::new()
    }
}

impl DexUi {
    pub fn new() -> Self {
        Self {
            list: SelectList::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) -> ScreenAreas {
        let base = Block::default().style(Style::default().bg(BG_BASE));
        frame.render_widget(base, area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        render_header(frame, layout[0], state);
        let mut areas = ScreenAreas {
            list: Rect::default(),
            detail: Rect::default(),
            search: layout[0],
        };
        match state.screen {
            Screen::Catalog => {
                areas.list = layout[1];
                render_catalog(frame, layout[1], state, &mut self.list);
            }
            Screen::Detail => {
                areas.detail = layout[1];
                render_detail(frame, layout[1], state);
            }
        }
        render_footer(frame, layout[2], state, &mut self.status_bar);
        areas
    }

    pub fn handle_list_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let actions = match event {
            EventKind::Key(key) => match key.code {
                crossterm::event::KeyCode::Enter => vec![Action::CatalogActivate],
                crossterm::event::KeyCode::PageDown => vec![Action::SelectionPage(1)],
                crossterm::event::KeyCode::PageUp => vec![Action::SelectionPage(-1)],
                _ => {
                    let items = catalog_items(state);
                    let props = SelectListProps {
                        items: &items,
                        count: items.len(),
                        selected: state.selected_index.min(items.len().saturating_sub(1)),
                        is_focused: true,
                        style: list_style(),
                        behavior: SelectListBehavior {
                            show_scrollbar: true,
                            wrap_navigation: false,
                        },
                        on_select: Action::CatalogSelect,
                        render_item: &|item| item.clone(),
                    };
                    let actions: Vec<_> = self.list.handle_event(event, props).into_iter().collect();
                    return handler_response(actions);
                }
            },
            EventKind::Scroll { delta, .. } => vec![Action::SelectionMove((*delta * 3) as i16)],
            _ => vec![],
        };
        handler_response(actions)
    }

    pub fn handle_search_event(&mut self, event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
        let actions = match event {
            EventKind::Key(key) => match key.code {
                crossterm::event::KeyCode::Esc => vec![Action::SearchCancel],
                crossterm::event::KeyCode::Enter => vec![Action::SearchSubmit],
                crossterm::event::KeyCode::Backspace => vec![Action::SearchBackspace],
                crossterm::event::KeyCode::Char(ch) => vec![Action::SearchInput(ch)],
                _ => vec![],
            },
            _ => vec![],
        };
        handler_response(actions)
    }

    pub fn handle_detail_event(&mut self, event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
        let actions = match event {
            EventKind::Key(key) => match key.code {
                crossterm::event::KeyCode::Esc
                | crossterm::event::KeyCode::Backspace
                | crossterm::event::KeyCode::Char('b') => vec![Action::BackToCatalog],
                _ => vec![],
            },
            _ => vec![],
        };
        handler_response(actions)
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let title_style = Style::default().fg(ACCENT_RED).add_modifier(Modifier::BOLD);
    let line = match state.screen {
        Screen::Catalog => {
            let search = if state.search.active {
                format!("/{}_", state.search.query)
            } else if state.search.query.is_empty() {
                "/".to_string()
            } else {
                format!("/{}", state.search.query)
            };
            Line::from(vec![
                Span::styled("POKEDEX", title_style),
                Span::raw("  |  Search: "),
                Span::styled(search, Style::default().fg(TEXT_MAIN)),
                Span::raw("  |  "),
                Span::styled(
                    format!(
                        "{}/{} loaded",
                        state.catalog_items.len(),
                        state.filtered_indices.len()
                    ),
                    Style::default().fg(TEXT_DIM),
                ),
            ])
        }
        Screen::Detail => {
            let heading = state
                .detail_record()
                .map(|record| format!("{} {}", record.display_name(), record.dex_number()))
                .or_else(|| state.detail_id.map(|id| format!("#{id:03}")))
                .unwrap_or_default();
            Line::from(vec![
                Span::styled("POKEDEX", title_style),
                Span::raw("  |  "),
                Span::styled(heading, Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD)),
            ])
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_catalog(frame: &mut Frame, area: Rect, state: &AppState, list: &mut SelectList) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(area);

    render_catalog_list(frame, layout[0], state, list);
    render_catalog_preview(frame, layout[1], state);
}

fn render_catalog_list(frame: &mut Frame, area: Rect, state: &AppState, list: &mut SelectList) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("ROSTER")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(ACCENT_RED));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.nothing_found() {
        frame.render_widget(
            Paragraph::new("No Pokemon found.")
                .style(Style::default().fg(TEXT_DIM))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let items = catalog_items(state);
    if items.is_empty() {
        let placeholder = if state.roster.is_loading() {
            "Loading roster..."
        } else if state.roster.is_failed() {
            "Roster unavailable."
        } else {
            "Loading entries..."
        };
        frame.render_widget(
            Paragraph::new(placeholder).style(Style::default().fg(TEXT_DIM)),
            inner,
        );
        return;
    }

    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state.selected_index.min(items.len().saturating_sub(1)),
        is_focused: !state.search.active,
        style: list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: Action::CatalogSelect,
        render_item: &|item| item.clone(),
    };
    list.render(frame, inner, props);
}

fn render_catalog_preview(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("PREVIEW")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(item) = state.selected_item() else {
        frame.render_widget(
            Paragraph::new("[select an entry]")
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_DIM)),
            inner,
        );
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(2)])
        .split(inner);

    match state.sprite_cache.get(&item.id) {
        Some(sprite_data) => sprite::draw_sprite(frame, layout[0], sprite_data),
        None => frame.render_widget(
            Paragraph::new("[loading sprite]")
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_DIM)),
            layout[0],
        ),
    }

    let caption = Text::from(vec![
        Line::from(Span::styled(
            format!("{} {}", item.dex_number(), item.display_name()),
            Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
        )),
        type_badges(item),
    ]);
    frame.render_widget(Paragraph::new(caption).alignment(Alignment::Center), layout[1]);
}

fn render_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let theme_color = state
        .detail_record()
        .and_then(PokemonRecord::primary_type)
        .and_then(theme::type_color);
    let border = Style::default().fg(theme_color.unwrap_or(TEXT_DIM));

    let has_evolutions = !state.resolved_evolutions().is_empty();
    let constraints = if has_evolutions {
        vec![Constraint::Min(10), Constraint::Length(9)]
    } else {
        vec![Constraint::Min(10)]
    };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(layout[0]);

    render_detail_sprite(frame, top[0], state, border);
    render_detail_profile(frame, top[1], state, border);
    if has_evolutions {
        render_evolution_strip(frame, layout[1], state, border);
    }
}

fn render_detail_sprite(frame: &mut Frame, area: Rect, state: &AppState, border: Style) {
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sprite_data = state
        .detail_id
        .and_then(|id| state.sprite_cache.get(&id));
    match sprite_data {
        Some(sprite_data) => sprite::draw_sprite(frame, inner, sprite_data),
        None => {
            let content = if state.sprite_loading {
                "[loading sprite]"
            } else {
                "[no sprite]"
            };
            frame.render_widget(
                Paragraph::new(content)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(TEXT_DIM)),
                inner,
            );
        }
    }
}

fn render_detail_profile(frame: &mut Frame, area: Rect, state: &AppState, border: Style) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("PROFILE")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(record) = state.detail_record() else {
        let placeholder = if state.detail.is_failed() {
            "Profile unavailable."
        } else {
            "Loading..."
        };
        frame.render_widget(
            Paragraph::new(placeholder).style(Style::default().fg(TEXT_DIM)),
            inner,
        );
        return;
    };

    let lines = vec![
        Line::from(Span::styled(
            format!("{} {}", record.display_name(), record.dex_number()),
            Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
        )),
        type_badges(record),
        Line::default(),
        Line::from(record.weight_display()),
        Line::from(record.height_display()),
        Line::from(record.abilities_display()),
        Line::default(),
        Line::from(Span::styled(
            format!("Artwork: {}", crate::api::artwork_url(record.id)),
            Style::default().fg(TEXT_DIM),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn render_evolution_strip(frame: &mut Frame, area: Rect, state: &AppState, border: Style) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("EVOLUTIONS")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = state.resolved_evolutions();
    if line.is_empty() {
        return;
    }
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, line.len() as u32); line.len()])
        .split(inner);

    for (record, cell) in line.iter().zip(cells.iter()) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(*cell);
        match state.sprite_cache.get(&record.id) {
            Some(sprite_data) => sprite::draw_sprite(frame, rows[0], sprite_data),
            None => frame.render_widget(
                Paragraph::new("...")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(TEXT_DIM)),
                rows[0],
            ),
        }
        frame.render_widget(
            Paragraph::new(format!("{} {}", record.dex_number(), record.display_name()))
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_MAIN)),
            rows[1],
        );
    }
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = state.message.clone().unwrap_or_else(|| {
        if state.roster.is_loading() {
            "Loading roster...".to_string()
        } else if state.pending_nav.is_some() {
            "Opening entry...".to_string()
        } else if state.screen == Screen::Detail && state.detail.is_loading() {
            "Loading pokemon...".to_string()
        } else if state.evolutions.is_loading() {
            "Resolving evolutions...".to_string()
        } else {
            String::new()
        }
    });
    let hints = status_hints(state);
    let status_span = Span::styled(status, Style::default().fg(ACCENT_RED));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: None,
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default().fg(ACCENT_RED).add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&hints).with_separator("  "),
        center: StatusBarSection::hints(&[]),
        right: StatusBarSection::items(&status_items),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.search.active {
        return vec![
            StatusBarHint::new("Enter", "Apply"),
            StatusBarHint::new("Esc", "Cancel"),
            StatusBarHint::new("Bksp", "Delete"),
        ];
    }
    match state.screen {
        Screen::Catalog => vec![
            StatusBarHint::new("j/k", "Move"),
            StatusBarHint::new("Enter", "Open"),
            StatusBarHint::new("/", "Search"),
            StatusBarHint::new("q", "Quit"),
        ],
        Screen::Detail => vec![
            StatusBarHint::new("Esc/b", "Back"),
            StatusBarHint::new("q", "Quit"),
        ],
    }
}

fn catalog_items(state: &AppState) -> Vec<Line<'static>> {
    state
        .catalog_items
        .iter()
        .map(|item| {
            let mut spans = vec![
                Span::styled(
                    format!("{} ", item.dex_number()),
                    Style::default().fg(TEXT_DIM),
                ),
                Span::raw(format!("{:<12} ", item.name)),
            ];
            spans.extend(badge_spans(item));
            Line::from(spans)
        })
        .collect()
}

fn type_badges(record: &PokemonRecord) -> Line<'static> {
    Line::from(badge_spans(record))
}

fn badge_spans(record: &PokemonRecord) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for type_name in &record.types {
        let style = match theme::type_color(type_name) {
            Some(color) => Style::default().bg(color).fg(BADGE_TEXT),
            None => Style::default().fg(TEXT_DIM),
        };
        spans.push(Span::styled(format!(" {type_name} "), style));
        spans.push(Span::raw(" "));
    }
    spans
}

fn list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}
