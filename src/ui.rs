use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use std::io;

use crate::collection::{Collection, Record};
use crate::config::{self, format_date, ConfigStore};
use crate::drafts::{FeedbackDraft, ProjectDraft, QuestionDraft};
use crate::form::Form;
use crate::models::{
    FeedbackRecord, FeedbackStatus, PopupMode, ProjectRecord, ProjectStatus, QuestionRecord,
    Sentiment,
};
use crate::report;
use crate::sample;
use crate::summary::summarize;
use crate::view::{self, derive_view, facet_options, Facet, FeedbackRow, FilterValue, ListQuery, SortKey};

const TAB_TITLES: [&str; 4] = ["Projects", "Feedback", "Questions", "Summary"];
const PROJECTS_TAB: usize = 0;
const FEEDBACK_TAB: usize = 1;
const QUESTIONS_TAB: usize = 2;

/// One management page: its collection plus the view state over it.
pub struct Page<T> {
    pub collection: Collection<T>,
    pub query: ListQuery,
    pub list_state: ListState,
    facets: &'static [Facet],
    sort_keys: &'static [SortKey],
}

impl<T: Record> Page<T> {
    fn new(records: Vec<T>, sort: SortKey, facets: &'static [Facet], sort_keys: &'static [SortKey]) -> Self {
        let collection = Collection::from_records(records);
        let mut list_state = ListState::default();
        if !collection.is_empty() {
            list_state.select(Some(0));
        }
        Page {
            collection,
            query: ListQuery::new(sort),
            list_state,
            facets,
            sort_keys,
        }
    }
}

pub struct App {
    pub current_tab: usize,
    pub projects: Page<ProjectRecord>,
    pub feedback: Page<FeedbackRecord>,
    pub questions: Page<QuestionRecord>,
    pub popup_mode: PopupMode,
    pub form: Option<Form>,
    pub status_message: Option<String>,
    pub date_format: String,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: &ConfigStore) -> Result<Self> {
        Ok(App {
            current_tab: PROJECTS_TAB,
            projects: Page::new(
                sample::projects(),
                store.sort_for(config::PROJECTS_SORT)?,
                &[Facet::Status],
                &[SortKey::Date, SortKey::Name, SortKey::Progress, SortKey::Responses, SortKey::Insertion],
            ),
            feedback: Page::new(
                sample::feedback(),
                store.sort_for(config::FEEDBACK_SORT)?,
                &[Facet::Status, Facet::Priority, Facet::Sentiment, Facet::Category, Facet::Project],
                &[SortKey::Date, SortKey::Name, SortKey::Responses, SortKey::Insertion],
            ),
            questions: Page::new(
                sample::questions(),
                store.sort_for(config::QUESTIONS_SORT)?,
                &[Facet::Type, Facet::Category, Facet::Required],
                &[SortKey::Usage, SortKey::Name, SortKey::Responses, SortKey::LastUsed, SortKey::Insertion],
            ),
            popup_mode: PopupMode::None,
            form: None,
            status_message: None,
            date_format: store.date_format()?,
            should_quit: false,
        })
    }

    pub fn feedback_rows(&self) -> Vec<FeedbackRow<'_>> {
        view::feedback_rows(
            self.feedback.collection.records(),
            self.projects.collection.records(),
            self.questions.collection.records(),
        )
    }

    /// Ids of the current page's derived view, in display order.
    pub fn visible_ids(&self) -> Vec<u32> {
        match self.current_tab {
            PROJECTS_TAB => derive_view(self.projects.collection.records(), &self.projects.query)
                .iter()
                .map(|p| p.id)
                .collect(),
            FEEDBACK_TAB => {
                let rows = self.feedback_rows();
                derive_view(&rows, &self.feedback.query)
                    .iter()
                    .map(|row| row.feedback.id)
                    .collect()
            }
            QUESTIONS_TAB => derive_view(self.questions.collection.records(), &self.questions.query)
                .iter()
                .map(|q| q.id)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn list_state(&self) -> Option<&ListState> {
        match self.current_tab {
            PROJECTS_TAB => Some(&self.projects.list_state),
            FEEDBACK_TAB => Some(&self.feedback.list_state),
            QUESTIONS_TAB => Some(&self.questions.list_state),
            _ => None,
        }
    }

    fn list_state_mut(&mut self) -> Option<&mut ListState> {
        match self.current_tab {
            PROJECTS_TAB => Some(&mut self.projects.list_state),
            FEEDBACK_TAB => Some(&mut self.feedback.list_state),
            QUESTIONS_TAB => Some(&mut self.questions.list_state),
            _ => None,
        }
    }

    fn query_mut(&mut self) -> Option<&mut ListQuery> {
        match self.current_tab {
            PROJECTS_TAB => Some(&mut self.projects.query),
            FEEDBACK_TAB => Some(&mut self.feedback.query),
            QUESTIONS_TAB => Some(&mut self.questions.query),
            _ => None,
        }
    }

    pub fn selected_id(&self) -> Option<u32> {
        let selected = self.list_state()?.selected()?;
        self.visible_ids().get(selected).copied()
    }

    /// Keeps the selection inside the derived view after it changed.
    fn clamp_selection(&mut self) {
        let len = self.visible_ids().len();
        if let Some(state) = self.list_state_mut() {
            let selected = match state.selected() {
                _ if len == 0 => None,
                Some(i) if i >= len => Some(len - 1),
                Some(i) => Some(i),
                None => Some(0),
            };
            state.select(selected);
        }
    }

    fn reset_selection(&mut self) {
        let len = self.visible_ids().len();
        if let Some(state) = self.list_state_mut() {
            state.select(if len == 0 { None } else { Some(0) });
        }
    }

    pub fn next_tab(&mut self) {
        self.current_tab = (self.current_tab + 1) % TAB_TITLES.len();
        self.status_message = None;
    }

    pub fn previous_tab(&mut self) {
        self.current_tab = if self.current_tab == 0 { TAB_TITLES.len() - 1 } else { self.current_tab - 1 };
        self.status_message = None;
    }

    pub fn next_item(&mut self) {
        let len = self.visible_ids().len();
        if let Some(state) = self.list_state_mut() {
            if len == 0 {
                state.select(None);
                return;
            }
            let i = match state.selected() {
                Some(i) if i + 1 < len => i + 1,
                _ => 0,
            };
            state.select(Some(i));
        }
    }

    pub fn previous_item(&mut self) {
        let len = self.visible_ids().len();
        if let Some(state) = self.list_state_mut() {
            if len == 0 {
                state.select(None);
                return;
            }
            let i = match state.selected() {
                Some(i) if i > 0 && i < len => i - 1,
                _ => len - 1,
            };
            state.select(Some(i));
        }
    }

    fn facet_choices(&self, facet: Facet) -> Vec<String> {
        match self.current_tab {
            PROJECTS_TAB => facet_options(self.projects.collection.records(), facet),
            FEEDBACK_TAB => facet_options(&self.feedback_rows(), facet),
            QUESTIONS_TAB => facet_options(self.questions.collection.records(), facet),
            _ => Vec::new(),
        }
    }

    fn page_facets(&self) -> &'static [Facet] {
        match self.current_tab {
            PROJECTS_TAB => self.projects.facets,
            FEEDBACK_TAB => self.feedback.facets,
            QUESTIONS_TAB => self.questions.facets,
            _ => &[],
        }
    }

    /// Steps facet `slot` of the current page through `all` and every value
    /// present in the collection.
    pub fn cycle_facet(&mut self, slot: usize) {
        let facet = match self.page_facets().get(slot) {
            Some(facet) => *facet,
            None => return,
        };
        let choices = self.facet_choices(facet);
        if let Some(query) = self.query_mut() {
            let next = match query.filter(facet) {
                FilterValue::All => choices.first().cloned().map_or(FilterValue::All, FilterValue::Is),
                FilterValue::Is(current) => {
                    let position = choices.iter().position(|c| c.eq_ignore_ascii_case(current));
                    match position.and_then(|i| choices.get(i + 1)) {
                        Some(value) => FilterValue::Is(value.clone()),
                        None => FilterValue::All,
                    }
                }
            };
            log::debug!("{} filter -> {}", facet.as_str(), next.label());
            query.set_filter(facet, next);
        }
        self.reset_selection();
    }

    pub fn cycle_sort(&mut self) {
        let keys = match self.current_tab {
            PROJECTS_TAB => self.projects.sort_keys,
            FEEDBACK_TAB => self.feedback.sort_keys,
            QUESTIONS_TAB => self.questions.sort_keys,
            _ => return,
        };
        if let Some(query) = self.query_mut() {
            query.sort = query.sort.next(keys);
        }
        self.reset_selection();
    }

    pub fn toggle_reverse(&mut self) {
        if let Some(query) = self.query_mut() {
            query.reverse = !query.reverse;
        }
        self.reset_selection();
    }

    pub fn clear_query(&mut self) {
        if let Some(query) = self.query_mut() {
            query.clear();
        }
        self.reset_selection();
    }

    pub fn start_search(&mut self) {
        if self.query_mut().is_some() {
            self.popup_mode = PopupMode::Search;
        }
    }

    pub fn search_input(&mut self, c: char) {
        if let Some(query) = self.query_mut() {
            query.search.push(c);
        }
        self.reset_selection();
    }

    pub fn search_backspace(&mut self) {
        if let Some(query) = self.query_mut() {
            query.search.pop();
        }
        self.reset_selection();
    }

    pub fn finish_search(&mut self, keep: bool) {
        if !keep {
            if let Some(query) = self.query_mut() {
                query.search.clear();
            }
            self.reset_selection();
        }
        self.popup_mode = PopupMode::None;
    }

    pub fn open_form(&mut self) {
        let (mut form, next_id) = match self.current_tab {
            PROJECTS_TAB => (ProjectDraft::form(), self.projects.collection.next_id()),
            FEEDBACK_TAB => (FeedbackDraft::form(), self.feedback.collection.next_id()),
            QUESTIONS_TAB => (QuestionDraft::form(), self.questions.collection.next_id()),
            _ => return,
        };
        form.title = format!("{} #{}", form.title, next_id);
        self.form = Some(form);
        self.popup_mode = PopupMode::Form;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.popup_mode = PopupMode::None;
    }

    /// Validates the open form and appends the record. A rejected form stays
    /// open with the error shown.
    pub fn submit_form(&mut self) {
        let today = chrono::Local::now().date_naive();
        let form = match self.form.as_ref() {
            Some(form) => form,
            None => return,
        };

        let created = match self.current_tab {
            PROJECTS_TAB => ProjectDraft::from_form(form, today).map(|draft| {
                let record = self.projects.collection.append(draft);
                format!("Created project #{} '{}'", record.id, record.name)
            }),
            FEEDBACK_TAB => FeedbackDraft::from_form(form, today).map(|draft| {
                let record = self.feedback.collection.append(draft);
                format!("Created feedback #{} '{}'", record.id, record.title)
            }),
            QUESTIONS_TAB => QuestionDraft::from_form(form).map(|draft| {
                let record = self.questions.collection.append(draft);
                format!("Created question #{}", record.id)
            }),
            _ => return,
        };

        match created {
            Ok(message) => {
                log::debug!("{}", message);
                self.status_message = Some(message);
                self.close_form();
                self.clamp_selection();
            }
            Err(e) => {
                if let Some(form) = self.form.as_mut() {
                    form.error = Some(e.to_string());
                }
            }
        }
    }

    pub fn delete_selected(&mut self) {
        let id = match self.selected_id() {
            Some(id) => id,
            None => return,
        };
        let removed = match self.current_tab {
            PROJECTS_TAB => self.projects.collection.remove(id).map(|p| p.name),
            FEEDBACK_TAB => self.feedback.collection.remove(id).map(|f| f.title),
            QUESTIONS_TAB => self.questions.collection.remove(id).map(|q| q.text),
            _ => None,
        };
        if let Some(name) = removed {
            self.status_message = Some(format!("Removed #{} '{}'", id, name));
        }
        self.clamp_selection();
    }

    pub fn handle_form_input(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Enter {
            self.submit_form();
            return;
        }
        if key == KeyCode::Esc {
            self.close_form();
            return;
        }
        if let Some(form) = &mut self.form {
            match key {
                KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => form.insert_char(c),
                KeyCode::Backspace => form.delete_char(),
                KeyCode::Tab | KeyCode::Down => form.next_field(),
                KeyCode::BackTab | KeyCode::Up => form.previous_field(),
                KeyCode::Left => form.move_cursor_left(),
                KeyCode::Right => form.move_cursor_right(),
                KeyCode::Home => form.move_to_start_of_line(),
                KeyCode::End => form.move_to_end_of_line(),
                _ => {}
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match self.popup_mode {
            PopupMode::Form => self.handle_form_input(key, modifiers),
            PopupMode::Search => match key {
                KeyCode::Enter => self.finish_search(true),
                KeyCode::Esc => self.finish_search(false),
                KeyCode::Backspace => self.search_backspace(),
                KeyCode::Char(c) => self.search_input(c),
                _ => {}
            },
            PopupMode::None => match key {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Tab => self.next_tab(),
                KeyCode::BackTab => self.previous_tab(),
                KeyCode::Down => self.next_item(),
                KeyCode::Up => self.previous_item(),
                KeyCode::Char('/') => self.start_search(),
                KeyCode::Char(c @ '1'..='5') => self.cycle_facet(c as usize - '1' as usize),
                KeyCode::Char('o') => self.cycle_sort(),
                KeyCode::Char('R') => self.toggle_reverse(),
                KeyCode::Char('x') => self.clear_query(),
                KeyCode::Char('n') => self.open_form(),
                KeyCode::Char('d') => self.delete_selected(),
                _ => {}
            },
        }
    }
}

pub fn run_tui(store: ConfigStore) -> Result<()> {
    let mut app = App::new(&store)?;
    drop(store);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::warn!("terminal loop stopped: {}", err);
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code, key.modifiers);
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    let titles: Vec<Line> = TAB_TITLES.iter().cloned().map(Line::from).collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Pulse Admin"))
        .select(app.current_tab)
        .style(Style::default().fg(Color::Cyan))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::Black),
        );

    f.render_widget(tabs, chunks[0]);

    match app.current_tab {
        PROJECTS_TAB => render_projects(f, app, chunks[1]),
        FEEDBACK_TAB => render_feedback(f, app, chunks[1]),
        QUESTIONS_TAB => render_questions(f, app, chunks[1]),
        _ => render_summary(f, app, chunks[1]),
    }

    let footer = match &app.status_message {
        Some(message) => Span::styled(message.clone(), Style::default().fg(Color::Green)),
        None => Span::styled(
            "Tab: page • ↑/↓: select • /: search • 1-5: filters • o: sort • R: reverse • x: clear • n: new • d: delete • q: quit",
            Style::default().fg(Color::DarkGray),
        ),
    };
    f.render_widget(Paragraph::new(Line::from(footer)), chunks[2]);

    if let Some(form) = &app.form {
        render_form(f, form);
    }
}

// Helper function to create centered rectangles for popups
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn query_bar(query: &ListQuery, facets: &[Facet], searching: bool) -> Paragraph<'static> {
    let search_style = if searching {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if searching { "_" } else { "" };
    let direction = if query.is_descending() { "↓" } else { "↑" };

    let mut spans = vec![
        Span::raw("Search: "),
        Span::styled(format!("{}{}", query.search, cursor), search_style),
    ];
    for (i, facet) in facets.iter().enumerate() {
        let value = query.filter(*facet);
        let color = if *value == FilterValue::All { Color::DarkGray } else { Color::Yellow };
        spans.push(Span::raw(format!("  {}:{}=", i + 1, facet.as_str())));
        spans.push(Span::styled(value.label().to_string(), Style::default().fg(color)));
    }
    spans.push(Span::raw(format!("  Sort: {} {}", query.sort.as_str(), direction)));

    Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL).title("View"))
}

fn list_block(title: &str, shown: usize, total: usize) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!("{} ({} of {})", title, shown, total))
}

fn highlight() -> Style {
    Style::default()
        .bg(Color::LightGreen)
        .add_modifier(Modifier::BOLD)
}

fn split_page(area: Rect) -> (Rect, Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
        .split(rows[1]);
    (rows[0], columns[0], columns[1])
}

fn project_status_color(status: ProjectStatus) -> Color {
    match status {
        ProjectStatus::Active => Color::Green,
        ProjectStatus::Completed => Color::Blue,
        ProjectStatus::Planning | ProjectStatus::Upcoming => Color::Yellow,
        ProjectStatus::Delayed => Color::LightRed,
        ProjectStatus::Cancelled => Color::DarkGray,
    }
}

fn render_projects(f: &mut Frame, app: &mut App, area: Rect) {
    let (bar, list_area, info_area) = split_page(area);
    let searching = app.popup_mode == PopupMode::Search;
    f.render_widget(query_bar(&app.projects.query, app.projects.facets, searching), bar);

    let records = app.projects.collection.records();
    let view = derive_view(records, &app.projects.query);
    let items: Vec<ListItem> = view
        .iter()
        .map(|project| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", project.name), Style::default().fg(Color::White)),
                Span::styled(format!("[{}%] ", project.progress), Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("[{}]", project.status),
                    Style::default().fg(project_status_color(project.status)),
                ),
            ]))
        })
        .collect();
    let block = list_block("Projects", view.len(), app.projects.collection.len());

    let selected = app.projects.list_state.selected().and_then(|i| view.get(i).copied());
    let info_text = match selected {
        Some(project) => {
            let team: Vec<String> = project
                .team
                .iter()
                .map(|member| format!("  • {} ({})", member.name, member.role))
                .collect();
            format!(
                "Project #{}: {}\n\n{}\n\nStatus: {}\nProgress: {}%\nDates: {} - {}\nResponses: {}\n\nTeam:\n{}",
                project.id,
                project.name,
                project.description,
                project.status,
                project.progress,
                format_date(project.dates.start, &app.date_format),
                format_date(project.dates.end, &app.date_format),
                project.responses,
                team.join("\n")
            )
        }
        None => "No project selected".to_string(),
    };

    let list = List::new(items).block(block).highlight_style(highlight()).highlight_symbol(">> ");
    let info = Paragraph::new(info_text)
        .block(Block::default().borders(Borders::ALL).title("Project Info"))
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));

    f.render_stateful_widget(list, list_area, &mut app.projects.list_state);
    f.render_widget(info, info_area);
}

fn feedback_status_color(status: FeedbackStatus) -> Color {
    match status {
        FeedbackStatus::Active => Color::Green,
        FeedbackStatus::Completed => Color::Blue,
        FeedbackStatus::Upcoming => Color::Yellow,
    }
}

fn sentiment_color(sentiment: Option<Sentiment>) -> Color {
    match sentiment {
        Some(Sentiment::Positive) => Color::Green,
        Some(Sentiment::Neutral) => Color::Gray,
        Some(Sentiment::Negative) => Color::Red,
        None => Color::DarkGray,
    }
}

fn render_feedback(f: &mut Frame, app: &mut App, area: Rect) {
    let (bar, list_area, info_area) = split_page(area);
    let searching = app.popup_mode == PopupMode::Search;
    f.render_widget(query_bar(&app.feedback.query, app.feedback.facets, searching), bar);

    let rows = app.feedback_rows();
    let view = derive_view(&rows, &app.feedback.query);
    let items: Vec<ListItem> = view
        .iter()
        .map(|row| {
            let record = row.feedback;
            let sentiment = record.sentiment.map_or("unrated", |s| s.as_str());
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", record.title), Style::default().fg(Color::White)),
                Span::styled(
                    format!("[{}] ", record.status),
                    Style::default().fg(feedback_status_color(record.status)),
                ),
                Span::styled(
                    format!("[{}]", sentiment),
                    Style::default().fg(sentiment_color(record.sentiment)),
                ),
            ]))
        })
        .collect();
    let block = list_block("Feedback", view.len(), app.feedback.collection.len());

    let selected = app.feedback.list_state.selected().and_then(|i| view.get(i).copied());
    let info_text = match selected {
        Some(row) => {
            let record = row.feedback;
            format!(
                "Feedback #{}: {}\n\n{}\n\nProject: {}\nStatus: {}\nDates: {} - {}\nQuestions: {} of {} found\nResponses: {}\nPriority: {}\nSentiment: {}\nCategory: {}\nTags: {}",
                record.id,
                record.title,
                record.description,
                row.project_name,
                record.status,
                format_date(record.dates.start, &app.date_format),
                format_date(record.dates.end, &app.date_format),
                row.question_count,
                record.question_ids.len(),
                record.responses,
                record.priority.map_or("-", |p| p.as_str()),
                record.sentiment.map_or("unrated", |s| s.as_str()),
                record.category.as_deref().unwrap_or("-"),
                record.tags.join(", ")
            )
        }
        None => "No feedback selected".to_string(),
    };

    let list = List::new(items).block(block).highlight_style(highlight()).highlight_symbol(">> ");
    let info = Paragraph::new(info_text)
        .block(Block::default().borders(Borders::ALL).title("Feedback Info"))
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));

    f.render_stateful_widget(list, list_area, &mut app.feedback.list_state);
    f.render_widget(info, info_area);
}

fn render_questions(f: &mut Frame, app: &mut App, area: Rect) {
    let (bar, list_area, info_area) = split_page(area);
    let searching = app.popup_mode == PopupMode::Search;
    f.render_widget(query_bar(&app.questions.query, app.questions.facets, searching), bar);

    let records = app.questions.collection.records();
    let view = derive_view(records, &app.questions.query);
    let items: Vec<ListItem> = view
        .iter()
        .map(|question| {
            let required = if question.required { "*" } else { " " };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}{} ", required, question.text), Style::default().fg(Color::White)),
                Span::styled(format!("[{}] ", question.kind), Style::default().fg(Color::Cyan)),
                Span::styled(format!("[{} uses]", question.usage_count), Style::default().fg(Color::Yellow)),
            ]))
        })
        .collect();
    let block = list_block("Questions", view.len(), app.questions.collection.len());

    let selected = app.questions.list_state.selected().and_then(|i| view.get(i).copied());
    let info_text = match selected {
        Some(question) => {
            let options: Vec<String> = question
                .options
                .iter()
                .map(|option| format!("  • {} = {}", option.text, option.value))
                .collect();
            format!(
                "Question #{}\n{}\n\n{}\n\nType: {}\nCategory: {}\nRequired: {}\nUsed in: {} campaigns\nResponses: {}\nLast used: {}\n\nOptions:\n{}",
                question.id,
                question.text,
                question.description.as_deref().unwrap_or(""),
                question.kind,
                question.category,
                if question.required { "yes" } else { "no" },
                question.usage_count,
                question.response_count,
                question
                    .last_used
                    .map_or_else(|| "never".to_string(), |date| format_date(date, &app.date_format)),
                options.join("\n")
            )
        }
        None => "No question selected".to_string(),
    };

    let list = List::new(items).block(block).highlight_style(highlight()).highlight_symbol(">> ");
    let info = Paragraph::new(info_text)
        .block(Block::default().borders(Borders::ALL).title("Question Info"))
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));

    f.render_stateful_widget(list, list_area, &mut app.questions.list_state);
    f.render_widget(info, info_area);
}

fn render_summary(f: &mut Frame, app: &App, area: Rect) {
    let summary = summarize(
        app.projects.collection.records(),
        app.feedback.collection.records(),
        app.questions.collection.records(),
    );
    let paragraph = Paragraph::new(report::summary_text(&summary))
        .block(Block::default().borders(Borders::ALL).title("Summary"))
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

fn render_form(f: &mut Frame, form: &Form) {
    let area = centered_rect(70, 80, f.area());
    f.render_widget(Clear, area);

    let mut lines: Vec<Line> = Vec::new();
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let marker = if field.required { "*" } else { " " };
        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let mut spans = vec![Span::styled(format!("{}{}: ", marker, field.label), label_style)];
        if focused {
            let chars: Vec<char> = field.value.chars().collect();
            let cursor = field.cursor.min(chars.len());
            let before: String = chars[..cursor].iter().collect();
            let at: String = chars.get(cursor).map_or(" ".to_string(), |c| c.to_string());
            let after: String = chars.iter().skip(cursor + 1).collect();
            spans.push(Span::raw(before));
            spans.push(Span::styled(at, Style::default().bg(Color::Cyan).fg(Color::Black)));
            spans.push(Span::raw(after));
        } else {
            spans.push(Span::raw(field.value.clone()));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    if let Some(field) = form.focused().filter(|field| !field.hint.is_empty()) {
        lines.push(Line::from(Span::styled(
            format!("{}: {}", field.label, field.hint),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if form.can_submit() {
        lines.push(Line::from(Span::styled("Enter: submit", Style::default().fg(Color::Green))));
    } else {
        lines.push(Line::from(Span::styled(
            format!("Submit disabled, required: {}", form.missing_required().join(", ")),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
    }
    lines.push(Line::from(Span::styled(
        "Tab/Shift-Tab: field • ←/→ Home/End: cursor • Esc: cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let popup = Paragraph::new(lines)
        .block(
            Block::default()
                .title(form.title.clone())
                .borders(Borders::ALL)
                .style(Style::default().bg(Color::Black)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(popup, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drafts;

    fn app() -> App {
        let store = ConfigStore::open_in_memory().unwrap();
        App::new(&store).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn pages_start_with_stored_sort_preferences() {
        let store = ConfigStore::open_in_memory().unwrap();
        store.set(config::PROJECTS_SORT, "progress").unwrap();
        let app = App::new(&store).unwrap();
        assert_eq!(app.projects.query.sort, SortKey::Progress);
        assert_eq!(app.visible_ids(), vec![3, 1, 4, 2, 5]);
    }

    #[test]
    fn live_search_narrows_the_view() {
        let mut app = app();
        app.handle_key(KeyCode::Char('/'), KeyModifiers::NONE);
        assert_eq!(app.popup_mode, PopupMode::Search);
        type_text(&mut app, "HYBRID");
        assert_eq!(app.visible_ids(), vec![2]);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.popup_mode, PopupMode::None);
        assert_eq!(app.projects.query.search, "HYBRID");

        app.handle_key(KeyCode::Char('/'), KeyModifiers::NONE);
        app.handle_key(KeyCode::Esc, KeyModifiers::NONE);
        assert!(app.projects.query.search.is_empty());
        assert_eq!(app.visible_ids().len(), 5);
    }

    #[test]
    fn facet_cycles_through_values_and_back_to_all() {
        let mut app = app();
        app.next_tab();
        assert_eq!(app.current_tab, FEEDBACK_TAB);
        // second facet of the feedback page is priority
        app.handle_key(KeyCode::Char('2'), KeyModifiers::NONE);
        assert_eq!(app.feedback.query.filter(Facet::Priority), &FilterValue::Is("medium".to_string()));
        app.handle_key(KeyCode::Char('2'), KeyModifiers::NONE);
        app.handle_key(KeyCode::Char('2'), KeyModifiers::NONE);
        assert_eq!(app.feedback.query.filter(Facet::Priority), &FilterValue::Is("high".to_string()));
        assert_eq!(app.visible_ids(), vec![4, 5, 3]);
        app.handle_key(KeyCode::Char('2'), KeyModifiers::NONE);
        assert_eq!(app.feedback.query.filter(Facet::Priority), &FilterValue::All);
    }

    #[test]
    fn sort_cycles_within_the_page_keys() {
        let mut app = app();
        app.current_tab = QUESTIONS_TAB;
        assert_eq!(app.questions.query.sort, SortKey::Usage);
        app.handle_key(KeyCode::Char('o'), KeyModifiers::NONE);
        assert_eq!(app.questions.query.sort, SortKey::Name);
        app.handle_key(KeyCode::Char('R'), KeyModifiers::NONE);
        assert!(app.questions.query.reverse);
        app.handle_key(KeyCode::Char('x'), KeyModifiers::NONE);
        assert!(!app.questions.query.reverse);
        assert_eq!(app.questions.query.sort, SortKey::Name);
    }

    #[test]
    fn incomplete_form_is_not_submitted() {
        let mut app = app();
        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        assert_eq!(app.popup_mode, PopupMode::Form);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.popup_mode, PopupMode::Form);
        assert_eq!(app.projects.collection.len(), 5);
        let error = app.form.as_ref().and_then(|form| form.error.clone()).unwrap();
        assert!(error.contains(drafts::NAME), "{}", error);
    }

    #[test]
    fn submitted_form_appends_with_the_next_id() {
        let mut app = app();
        app.current_tab = QUESTIONS_TAB;
        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        type_text(&mut app, "Would you join the mentoring pilot?");
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.popup_mode, PopupMode::None);
        let created = app.questions.collection.records().last().unwrap();
        assert_eq!(created.id, 9);
        assert_eq!(created.text, "Would you join the mentoring pilot?");
        assert!(app.status_message.as_deref().unwrap_or("").contains("#9"));
    }

    #[test]
    fn deleted_ids_are_not_handed_out_again() {
        let mut app = app();
        app.current_tab = QUESTIONS_TAB;
        app.questions.query.sort = SortKey::Insertion;
        app.questions.list_state.select(Some(7));
        assert_eq!(app.selected_id(), Some(8));
        app.handle_key(KeyCode::Char('d'), KeyModifiers::NONE);
        assert!(app.questions.collection.get(8).is_none());
        assert_eq!(app.questions.list_state.selected(), Some(6));

        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        type_text(&mut app, "Replacement");
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.questions.collection.records().last().map(|q| q.id), Some(9));
    }

    #[test]
    fn removing_a_project_leaves_feedback_pointing_at_unknown() {
        let mut app = app();
        app.projects.query.sort = SortKey::Insertion;
        app.projects.list_state.select(Some(1));
        app.delete_selected();
        let rows = app.feedback_rows();
        let orphan = rows.iter().find(|row| row.feedback.id == 3).unwrap();
        assert_eq!(orphan.project_name, crate::models::UNKNOWN_PROJECT);
    }

    #[test]
    fn selection_wraps_around() {
        let mut app = app();
        app.previous_item();
        assert_eq!(app.projects.list_state.selected(), Some(4));
        app.next_item();
        assert_eq!(app.projects.list_state.selected(), Some(0));
    }

    #[test]
    fn quit_key_stops_the_loop() {
        let mut app = app();
        app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(app.should_quit);
    }
}
