//! End-to-end browsing session: catalog → city → station → navigation loop.

use log::{error, info};

use crate::{
    error::{CoreError, ErrorCategory},
    navigator::StationNavigator,
    selection::SelectionService,
    service::WeatherDataService,
    station::strip_numeric_prefix,
    table::display_cell,
    ui::UserInterface,
};

/// Identifiers containing this marker describe the station list itself.
const CATALOG_INFO_MARKER: &str = "stations-meteo-en-place";
const CATALOG_INFO_LABEL: &str = "Station catalogue (info)";

/// What the user can do after looking at a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Previous,
    Next,
    Restart,
    Quit,
}

impl NavAction {
    pub fn label(self) -> &'static str {
        match self {
            NavAction::Previous => "← Previous station",
            NavAction::Next => "Next station →",
            NavAction::Restart => "⟲ Choose another station",
            NavAction::Quit => "✗ Quit",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|a| a.label() == label)
    }

    pub const fn all() -> &'static [NavAction] {
        &[NavAction::Previous, NavAction::Next, NavAction::Restart, NavAction::Quit]
    }

    /// Actions that make sense at the navigator's current position.
    pub fn available(navigator: &StationNavigator) -> Vec<NavAction> {
        let mut actions = Vec::with_capacity(4);
        if navigator.has_previous() {
            actions.push(NavAction::Previous);
        }
        if navigator.has_next() {
            actions.push(NavAction::Next);
        }
        actions.push(NavAction::Restart);
        actions.push(NavAction::Quit);
        actions
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Restart,
    Done,
}

/// Human-friendly label for a dataset identifier.
///
/// `"42-station-meteo-blagnac"` becomes `"Station meteo blagnac"`.
pub fn display_name(identifier: &str) -> String {
    if identifier.contains(CATALOG_INFO_MARKER) {
        return CATALOG_INFO_LABEL.to_string();
    }

    capitalize(&strip_numeric_prefix(identifier).replace('-', " "))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub struct WeatherStationOrchestrator<'a, U: UserInterface + ?Sized> {
    data: &'a WeatherDataService,
    selection: SelectionService<'a, U>,
    ui: &'a U,
    max_rows: usize,
}

impl<'a, U: UserInterface + ?Sized> WeatherStationOrchestrator<'a, U> {
    pub fn new(data: &'a WeatherDataService, ui: &'a U, max_rows: usize) -> Self {
        Self { data, selection: SelectionService::new(ui), ui, max_rows }
    }

    /// Run sessions until the user quits or cancels. Failures are reported
    /// to the user and end the run; nothing is retried.
    pub async fn run(&self) {
        loop {
            match self.execute_workflow().await {
                Ok(Flow::Restart) => info!("Restarting the workflow"),
                Ok(Flow::Done) => break,
                Err(e) => {
                    error!("Workflow aborted: {e}");
                    self.report(&e);
                    break;
                }
            }
        }
    }

    fn report(&self, err: &CoreError) {
        match err.category() {
            ErrorCategory::Connection => {
                self.ui.display_header("CRITICAL CONNECTION ERROR");
                self.ui.display_message(&format!("Could not retrieve the data: {err}"));
                self.ui.display_message("Check your internet connection or the API URL.");
            }
            ErrorCategory::Configuration => {
                self.ui.display_header("CONFIGURATION ERROR");
                self.ui.display_message(&format!("An expected column was not found: {err}"));
                self.ui.display_message("Check the column names in the configuration.");
            }
            ErrorCategory::Unexpected => {
                self.ui.display_header("UNEXPECTED ERROR");
                self.ui.display_message(&format!("An unexpected error occurred: {err}"));
            }
        }
    }

    async fn execute_workflow(&self) -> Result<Flow, CoreError> {
        self.ui.display_header("WEATHER STATIONS");
        self.ui.display_message("Loading the station catalog...");

        let catalog = self.data.get_catalog().await?;
        if catalog.is_empty() {
            self.ui.display_message("The station catalog is empty or could not be loaded.");
            return Ok(Flow::Done);
        }
        self.ui.display_message(&format!(
            "✓ {} weather stations found in the catalog.",
            catalog.len()
        ));

        let cities = self.data.get_cities().await?;
        let Some(city) = self.selection.select(&cities, "Choose a city:", Some("CITY SELECTION"))
        else {
            self.ui.display_message("No city selected. Exiting.");
            return Ok(Flow::Done);
        };

        let mut navigator = self.data.get_stations_for_city(&city).await?;
        if navigator.total() == 0 {
            self.ui.display_message("No station found for this city.");
            return Ok(Flow::Done);
        }

        if !self.choose_station(&city, &mut navigator) {
            self.ui.display_message("No station selected. Exiting.");
            return Ok(Flow::Done);
        }

        self.browse(&mut navigator).await
    }

    /// Prompt for a station and move the navigator onto it.
    fn choose_station(&self, city: &str, navigator: &mut StationNavigator) -> bool {
        let names: Vec<String> = navigator
            .iter()
            .map(|s| display_name(s.identifier()))
            .collect();

        navigator.reset();

        let prompt = format!("Choose a station for '{city}':");
        let Some(chosen) = self.selection.select(&names, &prompt, Some("STATION SELECTION")) else {
            return false;
        };
        let Some(index) = names.iter().position(|n| *n == chosen) else {
            return false;
        };

        // Names were built in navigator order, so the index is the offset.
        for _ in 0..index {
            navigator.next();
        }
        true
    }

    async fn browse(&self, navigator: &mut StationNavigator) -> Result<Flow, CoreError> {
        loop {
            let Some(station) = navigator.current() else {
                self.ui.display_message("No current station.");
                return Ok(Flow::Done);
            };
            let identifier = station.identifier().to_string();

            self.ui.display_header(&format!(
                "STATION ({}/{}): {}",
                navigator.position(),
                navigator.total(),
                display_name(&identifier)
            ));
            self.ui.display_message(&format!("ID: {identifier}"));
            self.ui.display_message("Loading data...");

            let data = self.data.get_station_data(&identifier).await?;
            if data.is_empty() {
                self.ui.display_message("⚠ No data available for this station.");
            } else {
                self.ui.display_message("✓ Data loaded and columns filtered.");
                if let Some(latest) = self.data.timestamps(&data).first() {
                    self.ui
                        .display_message(&format!("Latest reading: {}", display_cell(latest)));
                }
                self.ui.display_header("LATEST READINGS");
                self.ui.display_table(&data, self.max_rows);
            }

            let labels: Vec<String> = NavAction::available(navigator)
                .into_iter()
                .map(|a| a.label().to_string())
                .collect();
            let choice = self.ui.prompt_for_choice(&labels, "What would you like to do?");

            match choice.as_deref().and_then(NavAction::from_label) {
                Some(NavAction::Previous) => {
                    navigator.previous();
                }
                Some(NavAction::Next) => {
                    navigator.next();
                }
                Some(NavAction::Restart) => return Ok(Flow::Restart),
                Some(NavAction::Quit) | None => {
                    self.ui.display_message("Goodbye!");
                    return Ok(Flow::Done);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        service::tests::{
            CountingCatalog, FixedStation, readings, test_config, toulouse_catalog,
        },
        source::CatalogSource,
        table::Table,
        testing::ScriptedUi,
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn service_with(catalog: CountingCatalog, station: FixedStation) -> WeatherDataService {
        WeatherDataService::with_sources(&test_config(), Box::new(catalog), Box::new(station))
    }

    fn toulouse() -> CountingCatalog {
        CountingCatalog { table: toulouse_catalog(), ..Default::default() }
    }

    fn station_headers(ui: &ScriptedUi) -> Vec<String> {
        ui.headers().into_iter().filter(|h| h.starts_with("STATION (")).collect()
    }

    #[test]
    fn display_names_are_cleaned_up() {
        assert_eq!(display_name("42-station-meteo-blagnac"), "Station meteo blagnac");
        assert_eq!(display_name("Meteo-TOULOUSE"), "Meteo toulouse");
        assert_eq!(display_name("00-stations-meteo-en-place"), "Station catalogue (info)");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn actions_round_trip_through_labels() {
        for action in NavAction::all() {
            assert_eq!(NavAction::from_label(action.label()), Some(*action));
        }
        assert_eq!(NavAction::from_label("something else"), None);
    }

    #[test]
    fn edges_hide_unavailable_moves() {
        let mut nav = crate::navigator::build_navigator(vec![
            crate::station::StationRecord::new("1-a", "X"),
            crate::station::StationRecord::new("2-b", "X"),
        ]);

        assert_eq!(
            NavAction::available(&nav),
            [NavAction::Next, NavAction::Restart, NavAction::Quit]
        );
        nav.next();
        assert_eq!(
            NavAction::available(&nav),
            [NavAction::Previous, NavAction::Restart, NavAction::Quit]
        );
    }

    #[tokio::test]
    async fn browse_select_navigate_and_quit() {
        let data = service_with(toulouse(), FixedStation { table: readings() });
        let ui = ScriptedUi::new([
            "Toulouse",
            "Meteo b",
            NavAction::Previous.label(),
            NavAction::Quit.label(),
        ]);

        WeatherStationOrchestrator::new(&data, &ui, 1).run().await;

        let prompts = ui.prompts();
        assert_eq!(prompts[0].1, ["Blagnac", "Toulouse"]);
        assert_eq!(prompts[1].1, ["Meteo a", "Meteo b"]);
        assert_eq!(
            prompts[2].1,
            [NavAction::Previous.label(), NavAction::Restart.label(), NavAction::Quit.label()]
        );
        assert_eq!(
            prompts[3].1,
            [NavAction::Next.label(), NavAction::Restart.label(), NavAction::Quit.label()]
        );

        assert_eq!(
            station_headers(&ui),
            ["STATION (2/2): Meteo b", "STATION (1/2): Meteo a"]
        );

        let messages = ui.messages();
        assert!(messages.contains(&"ID: 1-meteo-b".to_string()));
        assert!(messages.contains(&"Latest reading: 2024-05-02T10:00".to_string()));
        assert_eq!(messages.last().map(String::as_str), Some("Goodbye!"));

        let tables = ui.tables();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].len(), 1, "table display is capped at max_rows");
    }

    #[tokio::test]
    async fn empty_catalog_ends_before_any_prompt() {
        let data = service_with(CountingCatalog::default(), FixedStation::default());
        let ui = ScriptedUi::new(["Toulouse"]);

        WeatherStationOrchestrator::new(&data, &ui, 10).run().await;

        assert!(ui.prompts().is_empty());
        assert!(ui
            .messages()
            .contains(&"The station catalog is empty or could not be loaded.".to_string()));
    }

    #[tokio::test]
    async fn cancelled_city_ends_the_session() {
        let data = service_with(toulouse(), FixedStation::default());
        let ui = ScriptedUi::new(Vec::<&str>::new());

        WeatherStationOrchestrator::new(&data, &ui, 10).run().await;

        assert_eq!(ui.prompts().len(), 1);
        assert_eq!(
            ui.messages().last().map(String::as_str),
            Some("No city selected. Exiting.")
        );
    }

    #[tokio::test]
    async fn cancelled_station_ends_the_session() {
        let data = service_with(toulouse(), FixedStation::default());
        let ui = ScriptedUi::new(["Toulouse"]);

        WeatherStationOrchestrator::new(&data, &ui, 10).run().await;

        assert_eq!(
            ui.messages().last().map(String::as_str),
            Some("No station selected. Exiting.")
        );
        assert!(station_headers(&ui).is_empty());
    }

    #[tokio::test]
    async fn missing_station_data_is_reported_and_browsing_continues() {
        let data = service_with(toulouse(), FixedStation::default());
        let ui = ScriptedUi::new(["Toulouse", "Meteo a", NavAction::Next.label()]);

        WeatherStationOrchestrator::new(&data, &ui, 10).run().await;

        let no_data = ui
            .messages()
            .iter()
            .filter(|m| *m == "⚠ No data available for this station.")
            .count();
        assert_eq!(no_data, 2);
        assert!(ui.tables().is_empty());
        assert_eq!(
            station_headers(&ui),
            ["STATION (1/2): Meteo a", "STATION (2/2): Meteo b"]
        );
        assert_eq!(ui.messages().last().map(String::as_str), Some("Goodbye!"));
    }

    #[tokio::test]
    async fn restart_reruns_the_whole_workflow_from_the_cache() {
        let catalog = toulouse();
        let calls = catalog.calls.clone();
        let data = service_with(catalog, FixedStation { table: readings() });
        let ui = ScriptedUi::new([
            "Toulouse",
            "Meteo a",
            NavAction::Restart.label(),
            "Blagnac",
            "Meteo c",
            NavAction::Quit.label(),
        ]);

        WeatherStationOrchestrator::new(&data, &ui, 10).run().await;

        let starts = ui.headers().iter().filter(|h| *h == "WEATHER STATIONS").count();
        assert_eq!(starts, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            station_headers(&ui),
            ["STATION (1/2): Meteo a", "STATION (1/1): Meteo c"]
        );
    }

    #[tokio::test]
    async fn unrecognised_navigation_answer_quits() {
        let data = service_with(toulouse(), FixedStation { table: readings() });
        let ui = ScriptedUi::new(["Toulouse", "Meteo b", "dance"]);

        WeatherStationOrchestrator::new(&data, &ui, 10).run().await;

        assert_eq!(ui.messages().last().map(String::as_str), Some("Goodbye!"));
        assert_eq!(station_headers(&ui).len(), 1);
    }

    #[tokio::test]
    async fn missing_column_is_reported_as_configuration_error() {
        let catalog = CountingCatalog {
            table: Table::new(vec!["other".into()], vec![vec![json!("x")]]),
            ..Default::default()
        };
        let data = service_with(catalog, FixedStation::default());
        let ui = ScriptedUi::new(["Toulouse"]);

        WeatherStationOrchestrator::new(&data, &ui, 10).run().await;

        assert_eq!(ui.headers().last().map(String::as_str), Some("CONFIGURATION ERROR"));
        assert!(ui.messages().iter().any(|m| m.contains("'id'")));
    }

    #[derive(Debug)]
    struct UnreachableCatalog;

    #[async_trait]
    impl CatalogSource for UnreachableCatalog {
        async fn load_catalog(&self) -> Result<Table, CoreError> {
            let source = reqwest::get("not a url").await.unwrap_err();
            Err(CoreError::Transport { url: "not a url".into(), source })
        }
    }

    #[tokio::test]
    async fn escaped_transport_failure_is_a_connection_error() {
        let data = WeatherDataService::with_sources(
            &test_config(),
            Box::new(UnreachableCatalog),
            Box::new(FixedStation::default()),
        );
        let ui = ScriptedUi::new(["Toulouse"]);

        WeatherStationOrchestrator::new(&data, &ui, 10).run().await;

        assert_eq!(
            ui.headers().last().map(String::as_str),
            Some("CRITICAL CONNECTION ERROR")
        );
        assert!(ui.prompts().is_empty());
    }
}
