use serde_json::Value;

use farmdata::arms::{
    ApiOutcome, ArmsClient, Comparison, NamedReport, OneOrMany, ReportFilters,
};

#[derive(Copy, Clone, Debug)]
pub enum Screen {
    Menu,
    ReportForm,
    CompareForm,
    Results,
    Metadata,
    Help,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    Years,
    State,
    Category,
}

/// Main menu, same entries as the original platform.
pub const MENU_ITEMS: [&str; 7] = [
    "View Farm Income Statement",
    "View Farm Balance Sheet",
    "View Financial Ratios",
    "Compare Farm Types",
    "View Structural Characteristics",
    "Available Years and States",
    "Exit",
];

/// Optional cross-tabulation category offered on report forms.
pub const CATEGORY_CHOICES: [(&str, Option<&str>); 5] = [
    ("None", None),
    ("Farm Typology", Some("collapsed farm typology")),
    ("Economic Class", Some("economic class")),
    ("NASS Region", Some("nass region")),
    ("Operator Age", Some("operator age")),
];

pub const COMPARE_CHOICES: [(&str, Comparison); 3] = [
    ("Farm Typology", Comparison::FarmTypology),
    ("Economic Class", Comparison::EconomicClass),
    ("NASS Region", Comparison::NassRegion),
];

#[derive(Clone, Debug)]
pub struct ResultsView {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Clone, Debug)]
pub struct MetadataView {
    pub years: Vec<i64>,
    pub states: Vec<String>,
}

pub struct App {
    client: ArmsClient,
    rt: tokio::runtime::Runtime,
    pub current_screen: Screen,
    pub menu_idx: usize,
    pub selected_report: NamedReport,
    pub years_input: String,
    pub state_input: String,
    pub year_input: String,
    pub category_idx: usize,
    pub compare_idx: usize,
    pub focused_field: FormField,
    pub input_mode: InputMode,
    pub results: Option<ResultsView>,
    pub metadata: Option<MetadataView>,
    pub status: Option<String>,
    pub scroll: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(client: ArmsClient) -> std::io::Result<Self> {
        // The client is async; the terminal loop is not. One owned runtime
        // drives every fetch.
        let rt = tokio::runtime::Runtime::new()?;
        Ok(Self {
            client,
            rt,
            current_screen: Screen::Menu,
            menu_idx: 0,
            selected_report: NamedReport::IncomeStatement,
            years_input: "2020".to_string(),
            state_input: "all".to_string(),
            year_input: "2020".to_string(),
            category_idx: 0,
            compare_idx: 0,
            focused_field: FormField::Years,
            input_mode: InputMode::Normal,
            results: None,
            metadata: None,
            status: None,
            scroll: 0,
            should_quit: false,
        })
    }

    pub fn menu_up(&mut self) {
        if self.menu_idx > 0 {
            self.menu_idx -= 1;
        }
    }

    pub fn menu_down(&mut self) {
        if self.menu_idx + 1 < MENU_ITEMS.len() {
            self.menu_idx += 1;
        }
    }

    /// Enter on the main menu.
    pub fn open_menu_selection(&mut self) {
        self.status = None;
        match self.menu_idx {
            0 => self.open_report_form(NamedReport::IncomeStatement),
            1 => self.open_report_form(NamedReport::BalanceSheet),
            2 => self.open_report_form(NamedReport::FinancialRatios),
            3 => {
                self.current_screen = Screen::CompareForm;
            }
            4 => self.open_report_form(NamedReport::StructuralCharacteristics),
            5 => self.load_metadata(),
            _ => self.should_quit = true,
        }
    }

    fn open_report_form(&mut self, report: NamedReport) {
        self.selected_report = report;
        self.focused_field = FormField::Years;
        self.current_screen = Screen::ReportForm;
    }

    pub fn next_field(&mut self) {
        self.focused_field = match self.focused_field {
            FormField::Years => FormField::State,
            FormField::State => FormField::Category,
            FormField::Category => FormField::Years,
        };
    }

    pub fn cycle_category(&mut self, delta: i32) {
        let len = CATEGORY_CHOICES.len() as i32;
        self.category_idx = (self.category_idx as i32 + delta).rem_euclid(len) as usize;
    }

    pub fn cycle_comparison(&mut self, delta: i32) {
        let len = COMPARE_CHOICES.len() as i32;
        self.compare_idx = (self.compare_idx as i32 + delta).rem_euclid(len) as usize;
    }

    pub fn back_to_menu(&mut self) {
        self.current_screen = Screen::Menu;
        self.input_mode = InputMode::Normal;
        self.scroll = 0;
    }

    /// Buffer for the field currently being edited.
    pub fn active_input(&mut self) -> &mut String {
        match self.current_screen {
            Screen::CompareForm => &mut self.year_input,
            _ => match self.focused_field {
                FormField::State => &mut self.state_input,
                _ => &mut self.years_input,
            },
        }
    }

    pub fn submit_report_form(&mut self) {
        let years = parse_years(&self.years_input);
        let state = self.state_input.trim();
        let category = CATEGORY_CHOICES[self.category_idx].1;

        let filters = ReportFilters {
            years: Some(years.clone().into()),
            state: if state.is_empty() {
                None
            } else {
                Some(state.into())
            },
            category: category.map(OneOrMany::from),
            ..ReportFilters::default()
        };

        let report = self.selected_report;
        let title = format!(
            "{} - {}",
            report.title(),
            years
                .iter()
                .map(|y| y.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        let outcome = self.rt.block_on(self.client.named_report(report, filters));
        self.apply_outcome(outcome, title);
    }

    pub fn submit_compare_form(&mut self) {
        let year = self.year_input.trim().parse::<i32>().unwrap_or(2020);
        let (label, kind) = COMPARE_CHOICES[self.compare_idx];
        let title = format!("Comparison by {label} - {year}");
        let outcome = self.rt.block_on(self.client.compare(kind, year, None));
        self.apply_outcome(outcome, title);
    }

    pub fn load_metadata(&mut self) {
        let years = self.rt.block_on(self.client.get_years());
        let states = self.rt.block_on(self.client.get_states());

        if let ApiOutcome::Failure { error } = &years {
            self.status = Some(error.clone());
            return;
        }
        if let ApiOutcome::Failure { error } = &states {
            self.status = Some(error.clone());
            return;
        }

        let mut year_list: Vec<i64> = years
            .data()
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_i64)
            .collect();
        year_list.sort_unstable_by(|a, b| b.cmp(a));

        let state_list: Vec<String> = states
            .records()
            .iter()
            .map(|rec| {
                rec.get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("Unknown")
                    .to_string()
            })
            .collect();

        self.metadata = Some(MetadataView {
            years: year_list,
            states: state_list,
        });
        self.scroll = 0;
        self.current_screen = Screen::Metadata;
    }

    fn apply_outcome(&mut self, outcome: ApiOutcome, title: String) {
        match outcome {
            ApiOutcome::Failure { error } => {
                self.status = Some(error);
                self.back_to_menu();
            }
            ApiOutcome::Success { data } => {
                let records: Vec<&serde_json::Map<String, Value>> =
                    data.iter().filter_map(Value::as_object).collect();
                if records.is_empty() {
                    self.status =
                        Some("No data available for the selected criteria.".to_string());
                    self.back_to_menu();
                    return;
                }
                let headers: Vec<String> = records[0].keys().cloned().collect();
                let rows: Vec<Vec<String>> = records
                    .iter()
                    .map(|rec| {
                        headers
                            .iter()
                            .map(|h| format_value(rec.get(h).unwrap_or(&Value::Null)))
                            .collect()
                    })
                    .collect();
                self.results = Some(ResultsView {
                    title,
                    headers,
                    rows,
                });
                self.status = None;
                self.scroll = 0;
                self.current_screen = Screen::Results;
            }
        }
    }
}

/// Comma-separated year list; anything unparsable falls back to 2020, like
/// the original prompt did.
pub fn parse_years(input: &str) -> Vec<i32> {
    let parsed: Result<Vec<i32>, _> = input
        .split(',')
        .map(|part| part.trim().parse::<i32>())
        .collect();
    match parsed {
        Ok(years) if !years.is_empty() => years,
        _ => vec![2020],
    }
}

/// Cell formatting: missing values as N/A, numbers with thousands separators
/// and two decimals.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "N/A".to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) => format_number(f),
            None => n.to_string(),
        },
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn format_number(n: f64) -> String {
    let formatted = format!("{:.2}", n.abs());
    let (int_part, frac_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));
    let grouped = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",");
    let sign = if n < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_years_splits_and_trims() {
        assert_eq!(parse_years("2020, 2019"), vec![2020, 2019]);
    }

    #[test]
    fn parse_years_falls_back_on_garbage() {
        assert_eq!(parse_years("two thousand twenty"), vec![2020]);
        assert_eq!(parse_years(""), vec![2020]);
    }

    #[test]
    fn null_renders_as_na() {
        assert_eq!(format_value(&Value::Null), "N/A");
    }

    #[test]
    fn numbers_get_separators_and_two_decimals() {
        assert_eq!(format_value(&json!(1234567.891)), "1,234,567.89");
        assert_eq!(format_value(&json!(42)), "42.00");
        assert_eq!(format_value(&json!(-9876.5)), "-9,876.50");
        assert_eq!(format_value(&json!(0)), "0.00");
    }

    #[test]
    fn strings_pass_through() {
        assert_eq!(format_value(&json!("Texas")), "Texas");
    }
}
