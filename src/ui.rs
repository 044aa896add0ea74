use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};

use crate::domain::{ColumnDescriptor, Field, TableConfig};
use crate::model::{Model, UIData};
use crate::pagination::{Control, ControlsPresentation};
use crate::presentation::{BodyPresentation, HeaderPresentation};

pub const PAGINATION_HEIGHT: u16 = 1;
pub const STATUSLINE_HEIGHT: u16 = 1;
pub const TABLE_HEADER_HEIGHT: u16 = 1;
pub const TABLE_BORDER_HEIGHT: u16 = 2;
pub const NUMERIC_COLUMN_WIDTH: u16 = 12;
pub const INDEX_COLUMN_WIDTH: u16 = 4;
pub const POPUP_WIDTH: u16 = 64;
pub const POPUP_HEIGHT: u16 = 18;

#[derive(Debug)]
pub struct TableUI {
    widths: Vec<Constraint>,
    right_aligned: Vec<bool>,
}

impl TableUI {
    pub fn new(cfg: &TableConfig) -> Self {
        Self {
            widths: cfg.columns.iter().map(Self::column_width).collect(),
            right_aligned: cfg
                .columns
                .iter()
                .map(|c| c.field.is_none_or(|f| f.is_numeric()))
                .collect(),
        }
    }

    fn column_width(column: &ColumnDescriptor) -> Constraint {
        match column.field {
            None => Constraint::Length(INDEX_COLUMN_WIDTH),
            Some(Field::Population) => {
                Constraint::Length(NUMERIC_COLUMN_WIDTH.max(column.label.len() as u16 + 2))
            }
            Some(Field::Name) => Constraint::Fill(3),
            Some(_) => Constraint::Fill(2),
        }
    }

    pub fn draw(&self, model: &Model, frame: &mut Frame) {
        let uidata = model.get_uidata();
        let [table_area, pagination_area, status_area] = Layout::vertical([
            Constraint::Min(TABLE_HEADER_HEIGHT + TABLE_BORDER_HEIGHT),
            Constraint::Length(PAGINATION_HEIGHT),
            Constraint::Length(STATUSLINE_HEIGHT),
        ])
        .areas(frame.area());

        self.draw_table(uidata, frame, table_area);
        frame.render_widget(Paragraph::new(Self::pagination_line(&uidata.controls)), pagination_area);
        frame.render_widget(
            Paragraph::new(Line::from(uidata.status_message.as_str()).dark_gray()),
            status_area,
        );

        if uidata.show_popup {
            Self::draw_popup(&uidata.popup_message, frame);
        }
    }

    fn draw_table(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let mut block = Block::bordered()
            .title(Line::from(Span::from(format!(" {} ", uidata.name)).bold()).centered())
            .title_bottom(Line::from(vec![" Help ".into(), "<?> ".blue().bold()]).right_aligned())
            .border_set(border::THICK);
        let inner = block.inner(area);
        let visible = inner.height.saturating_sub(TABLE_HEADER_HEIGHT) as usize;
        if let Some(hint) = Self::scroll_hint(&uidata.body, uidata.row_offset, visible) {
            block = block.title_bottom(Line::from(Span::raw(hint).dark_gray()).left_aligned());
        }

        let header = Self::header_row(&uidata.header, uidata.focused_column);
        let rows: Vec<Row> = match &uidata.body {
            BodyPresentation::Rows(rows) => rows
                .iter()
                .map(|row| {
                    Row::new(row.cells.iter().zip(self.right_aligned.iter()).map(
                        |(text, &right)| {
                            let line = Line::from(text.as_str());
                            Cell::from(if right { line.right_aligned() } else { line })
                        },
                    ))
                })
                .collect(),
            _ => Vec::new(),
        };

        let table = Table::new(rows, self.widths.clone())
            .header(header)
            .block(block)
            .column_spacing(1);
        let mut state = TableState::default().with_offset(uidata.row_offset);
        frame.render_stateful_widget(table, area, &mut state);

        // The placeholder spans every column, which a table row can not do.
        if let Some(text) = uidata.body.placeholder() {
            let body_area = Rect {
                y: inner.y + TABLE_HEADER_HEIGHT,
                height: inner.height.saturating_sub(TABLE_HEADER_HEIGHT),
                ..inner
            };
            frame.render_widget(
                Paragraph::new(Line::from(text.italic()).centered()),
                body_area,
            );
        }
    }

    /// Tells which page rows are on screen when the page does not fit.
    fn scroll_hint(body: &BodyPresentation, offset: usize, visible: usize) -> Option<String> {
        let BodyPresentation::Rows(rows) = body else {
            return None;
        };
        if rows.len() <= visible || visible == 0 {
            return None;
        }
        let first = rows.get(offset)?;
        let last = rows.get((offset + visible).min(rows.len()) - 1)?;
        Some(format!(" rows {}-{} <j/k> ", first.index, last.index))
    }

    fn header_row(header: &HeaderPresentation, focused_column: Option<usize>) -> Row<'static> {
        let cells = header.cells.iter().enumerate().map(|(idx, cell)| {
            let mut style = Style::default().add_modifier(Modifier::BOLD);
            if cell.is_sortable() {
                style = style.fg(Color::Cyan);
            }
            if cell.sorted.is_some() {
                style = style.fg(Color::Yellow);
            }
            if focused_column == Some(idx) {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            Cell::from(cell.text()).style(style)
        });
        Row::new(cells).height(TABLE_HEADER_HEIGHT)
    }

    fn pagination_line(controls: &ControlsPresentation) -> Line<'static> {
        let control = |c: &Control| {
            let span = Span::raw(format!(" {} ", c.label));
            if c.enabled {
                span.bold()
            } else {
                span.dark_gray()
            }
        };

        let mut spans = vec![control(&controls.first), control(&controls.previous)];
        for page in controls.pages.iter() {
            let span = Span::raw(format!(" {} ", page.label));
            spans.push(if page.current { span.reversed() } else { span });
        }
        spans.push(control(&controls.next));
        spans.push(control(&controls.last));
        spans.push(Span::raw(format!("  {}  ", controls.page_summary)));
        spans.push(Span::raw(format!("{}  ", controls.rows_per_page)).dark_gray());

        spans.push("rows: ".into());
        for &option in controls.page_size.options.iter() {
            let span = Span::raw(format!(" {option} "));
            spans.push(if option == controls.page_size.selected {
                span.reversed()
            } else {
                span.dark_gray()
            });
        }
        Line::from(spans)
    }

    fn draw_popup(message: &str, frame: &mut Frame) {
        let area = Self::centered_rect(frame.area(), POPUP_WIDTH, POPUP_HEIGHT);
        let block = Block::bordered()
            .title(Line::from(" Help ".bold()).centered())
            .title_bottom(Line::from(vec![" Close ".into(), "<Esc> ".blue().bold()]).centered())
            .border_set(border::THICK);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(message).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }

    fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
        let [area] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(area);
        let [area] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);
        area
    }
}
