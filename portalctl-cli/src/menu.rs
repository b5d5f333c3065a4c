//! Interactive menu loop
//!
//! Options 1-5 map to the four portal operations plus exit. Each handler
//! reports its own failures and returns to the menu; only I/O errors on the
//! console itself end the session.

use std::io::Write;

use anyhow::Result;
use portalctl_core::models::{CitizenForm, Enrollment, NewCitizen, ValidationError};
use portalctl_core::PortalApi;

use crate::prompt::Prompter;
use crate::render;

const BANNER_RULE: &str = "====";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    RegisterCitizen,
    ListEvents,
    Enroll,
    PopularityReport,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::RegisterCitizen),
            "2" => Some(Self::ListEvents),
            "3" => Some(Self::Enroll),
            "4" => Some(Self::PopularityReport),
            "5" => Some(Self::Exit),
            _ => None,
        }
    }
}

pub struct Menu<'a, P: ?Sized, I, W> {
    portal: &'a P,
    prompter: I,
    out: W,
    styled: bool,
}

impl<'a, P, I, W> Menu<'a, P, I, W>
where
    P: PortalApi + ?Sized,
    I: Prompter,
    W: Write,
{
    pub fn new(portal: &'a P, prompter: I, out: W, styled: bool) -> Self {
        Self {
            portal,
            prompter,
            out,
            styled,
        }
    }

    /// Run until the user picks Exit or input ends.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.print_banner()?;

            let Some(answer) = self.prompter.ask("Choose an option:", None)? else {
                tracing::debug!("input closed, leaving menu");
                break;
            };

            match MenuChoice::parse(&answer) {
                Some(MenuChoice::RegisterCitizen) => self.register_citizen().await?,
                Some(MenuChoice::ListEvents) => self.list_events().await?,
                Some(MenuChoice::Enroll) => self.enroll().await?,
                Some(MenuChoice::PopularityReport) => self.popularity_report().await?,
                Some(MenuChoice::Exit) => {
                    writeln!(self.out, "Exiting...")?;
                    break;
                }
                None => writeln!(self.out, "Invalid option. Try again.")?,
            }

            if !self.prompter.pause()? {
                break;
            }
        }
        Ok(())
    }

    fn print_banner(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "\n{rule} Smart City Events Portal {rule}",
            rule = BANNER_RULE
        )?;
        writeln!(self.out, "1. Register new citizen")?;
        writeln!(self.out, "2. List upcoming events")?;
        writeln!(self.out, "3. Enroll in an event")?;
        writeln!(self.out, "4. Most popular events report")?;
        writeln!(self.out, "5. Exit")?;
        self.out.flush()?;
        Ok(())
    }

    /// Option 1
    async fn register_citizen(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- New Citizen Registration ---")?;

        let Some(form) = self.collect_citizen_form()? else {
            return Ok(());
        };

        let citizen = match NewCitizen::parse(&form) {
            Ok(citizen) => citizen,
            Err(ValidationError::InvalidDate { .. }) => {
                writeln!(
                    self.out,
                    "\nERROR: Invalid date format. Use DD/MM/YYYY. Registration cancelled."
                )?;
                return Ok(());
            }
            Err(err) => {
                writeln!(self.out, "\nERROR: {}. Registration cancelled.", err)?;
                return Ok(());
            }
        };

        match self.portal.register_citizen(&citizen).await {
            Ok(id) => {
                writeln!(self.out, "Created person record with ID: {}", id)?;
                writeln!(self.out, "\nCitizen registered successfully!")?;
            }
            Err(err) => {
                tracing::debug!(error = %err, "citizen registration failed");
                writeln!(self.out, "\nError registering citizen: {}", err)?;
            }
        }
        Ok(())
    }

    fn collect_citizen_form(&mut self) -> Result<Option<CitizenForm>> {
        macro_rules! ask {
            ($label:expr, $help:expr) => {
                match self.prompter.ask($label, $help)? {
                    Some(answer) => answer,
                    None => return Ok(None),
                }
            };
        }

        let name = ask!("Full name:", None);
        let phone = ask!("Phone (optional):", Some("Leave blank to skip"));
        let email = ask!("E-mail:", None);
        let cpf = ask!("CPF (digits only):", Some("11 digits, no dots or dashes"));
        let gender = ask!("Gender:", None);
        let birth_date = ask!("Birth date (DD/MM/YYYY):", Some("e.g. 25/12/1990"));

        Ok(Some(CitizenForm {
            name,
            phone,
            email,
            cpf,
            gender,
            birth_date,
        }))
    }

    /// Option 2
    async fn list_events(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Upcoming Events ---")?;

        match self.portal.upcoming_events().await {
            Ok(events) if events.is_empty() => {
                writeln!(self.out, "No upcoming events found.")?;
            }
            Ok(events) => {
                write!(self.out, "{}", render::events_table(&events).render(self.styled))?;
            }
            Err(err) => {
                tracing::debug!(error = %err, "listing events failed");
                writeln!(self.out, "Error listing events: {}", err)?;
            }
        }
        Ok(())
    }

    /// Option 3
    async fn enroll(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Event Enrollment ---")?;

        self.list_events().await?;

        let Some(event_answer) = self.prompter.ask("\nEnter the event ID to enroll in:", None)? else {
            return Ok(());
        };
        let Ok(event_id) = event_answer.trim().parse::<i32>() else {
            return self.integer_ids_required();
        };

        writeln!(self.out, "\nRegistered citizens:")?;
        let citizens = match self.portal.citizens().await {
            Ok(citizens) => citizens,
            Err(err) => {
                writeln!(self.out, "\nENROLLMENT ERROR: {}", err)?;
                return Ok(());
            }
        };
        if citizens.is_empty() {
            writeln!(self.out, "No citizens registered.")?;
            return Ok(());
        }
        write!(self.out, "{}", render::citizen_list(&citizens))?;

        let Some(citizen_answer) = self.prompter.ask("\nEnter the ID of the citizen to enroll:", None)? else {
            return Ok(());
        };
        let Ok(citizen_id) = citizen_answer.trim().parse::<i32>() else {
            return self.integer_ids_required();
        };

        let enrollment = Enrollment {
            citizen_id,
            event_id,
            ticket: self.portal.default_ticket(),
        };

        writeln!(self.out, "\nConfiguring session for enrollment...")?;
        writeln!(
            self.out,
            "Trying to enroll citizen {} in event {}...",
            citizen_id, event_id
        )?;

        match self.portal.enroll(&enrollment).await {
            Ok(outcome) => {
                for notice in &outcome.notices {
                    writeln!(self.out, "\nDATABASE NOTICE: {}", notice)?;
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, citizen_id, event_id, "enrollment failed");
                writeln!(self.out, "\nENROLLMENT ERROR: {}", err)?;
            }
        }
        Ok(())
    }

    fn integer_ids_required(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "\nERROR: Citizen and event IDs must be integers."
        )?;
        Ok(())
    }

    /// Option 4
    async fn popularity_report(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Management Report: Most Popular Events ---")?;

        match self.portal.popular_events(None).await {
            Ok(report) if report.is_empty() => {
                writeln!(self.out, "No events found for the report.")?;
            }
            Ok(report) => {
                write!(
                    self.out,
                    "{}",
                    render::popularity_table(&report).render(self.styled)
                )?;
            }
            Err(err) => {
                tracing::debug!(error = %err, "popularity report failed");
                writeln!(self.out, "Error generating report: {}", err)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::LinePrompter;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use portalctl_core::models::{
        CitizenSummary, EnrollmentOutcome, EventPopularity, TicketType, UpcomingEvent,
    };
    use portalctl_core::PortalError;
    use std::io::{self, Cursor};
    use std::sync::Mutex;

    /// In-memory portal recording what the menu asked for
    #[derive(Default)]
    struct FakePortal {
        events: Vec<UpcomingEvent>,
        citizens: Vec<CitizenSummary>,
        report: Vec<EventPopularity>,
        notices: Vec<String>,
        reject_enrollment: Option<String>,
        fail_events: bool,
        registered: Mutex<Vec<NewCitizen>>,
        enrollments: Mutex<Vec<Enrollment>>,
    }

    #[async_trait]
    impl PortalApi for FakePortal {
        async fn register_citizen(&self, citizen: &NewCitizen) -> portalctl_core::Result<i32> {
            let mut registered = self.registered.lock().unwrap();
            registered.push(citizen.clone());
            Ok(100 + registered.len() as i32)
        }

        async fn upcoming_events(&self) -> portalctl_core::Result<Vec<UpcomingEvent>> {
            if self.fail_events {
                return Err(PortalError::config("connection lost"));
            }
            Ok(self.events.clone())
        }

        async fn citizens(&self) -> portalctl_core::Result<Vec<CitizenSummary>> {
            Ok(self.citizens.clone())
        }

        async fn enroll(&self, enrollment: &Enrollment) -> portalctl_core::Result<EnrollmentOutcome> {
            self.enrollments.lock().unwrap().push(enrollment.clone());
            if let Some(message) = &self.reject_enrollment {
                return Err(PortalError::Rejected {
                    message: message.clone(),
                });
            }
            Ok(EnrollmentOutcome {
                notices: self.notices.clone(),
            })
        }

        async fn popular_events(
            &self,
            _limit: Option<i64>,
        ) -> portalctl_core::Result<Vec<EventPopularity>> {
            Ok(self.report.clone())
        }

        fn default_ticket(&self) -> TicketType {
            TicketType::default()
        }
    }

    fn sample_event() -> UpcomingEvent {
        UpcomingEvent {
            id: 4,
            name: "Festival de Jazz".into(),
            description: Some("Ao ar livre".into()),
            starts_at: NaiveDate::from_ymd_opt(2030, 6, 1)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap(),
            kind: Some("MUSICA".into()),
            price: Some(0.0),
            capacity: Some(300),
            venue: "Parque Central".into(),
            seats_left: Some(120),
        }
    }

    fn sample_citizens() -> Vec<CitizenSummary> {
        vec![CitizenSummary {
            id: 12,
            name: "Ana Souza".into(),
        }]
    }

    async fn run_menu(portal: &FakePortal, input: &str) -> String {
        let mut out = Vec::new();
        let prompter = LinePrompter::new(Cursor::new(input.to_string()), io::sink());
        Menu::new(portal, prompter, &mut out, false)
            .run()
            .await
            .expect("menu failed");
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn choice_parsing() {
        assert_eq!(MenuChoice::parse(" 1 "), Some(MenuChoice::RegisterCitizen));
        assert_eq!(MenuChoice::parse("5"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("6"), None);
        assert_eq!(MenuChoice::parse("one"), None);
    }

    #[tokio::test]
    async fn exit_option_ends_loop() {
        let out = run_menu(&FakePortal::default(), "5\n").await;
        assert!(out.contains("==== Smart City Events Portal ===="));
        assert!(out.contains("Exiting..."));
    }

    #[tokio::test]
    async fn end_of_input_ends_loop() {
        let out = run_menu(&FakePortal::default(), "").await;
        assert!(out.contains("5. Exit"));
        assert!(!out.contains("Exiting..."));
    }

    #[tokio::test]
    async fn invalid_option_reprompts() {
        let out = run_menu(&FakePortal::default(), "9\n\n5\n").await;
        assert!(out.contains("Invalid option. Try again."));
        assert_eq!(out.matches("Smart City Events Portal").count(), 2);
    }

    #[tokio::test]
    async fn registers_valid_citizen() {
        let portal = FakePortal::default();
        let input = "Maria da Silva\n\nmaria@example.com\n12345678901\nFeminino\n25/12/1990\n";
        let out = run_menu(&portal, &format!("1\n{input}\n5\n")).await;

        assert!(out.contains("Created person record with ID: 101"));
        assert!(out.contains("Citizen registered successfully!"));

        let registered = portal.registered.lock().unwrap();
        assert_eq!(registered.len(), 1);
        assert_eq!(registered[0].phone.as_deref(), None);
        assert_eq!(registered[0].birth_date.date().to_string(), "1990-12-25");
    }

    #[tokio::test]
    async fn bad_birth_date_cancels_registration() {
        let portal = FakePortal::default();
        let input = "Maria\n\nmaria@example.com\n12345678901\nFeminino\n1990-12-25\n";
        let out = run_menu(&portal, &format!("1\n{input}\n5\n")).await;

        assert!(out.contains("Invalid date format. Use DD/MM/YYYY. Registration cancelled."));
        assert!(portal.registered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn other_validation_errors_cancel_registration() {
        let portal = FakePortal::default();
        let input = "Maria\n\nmaria@example.com\n123.456.789-01\nFeminino\n25/12/1990\n";
        let out = run_menu(&portal, &format!("1\n{input}\n5\n")).await;

        assert!(out.contains("CPF: must contain digits only. Registration cancelled."));
        assert!(portal.registered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn lists_events_as_table() {
        let portal = FakePortal {
            events: vec![sample_event()],
            ..Default::default()
        };
        let out = run_menu(&portal, "2\n\n5\n").await;
        assert!(out.contains("Upcoming Events - Portal da Cultura"));
        assert!(out.contains("Festival de Jazz"));
        assert!(out.contains("01/06/2030 18:00"));
        assert!(out.contains("Parque Central"));
    }

    #[tokio::test]
    async fn no_events_message() {
        let out = run_menu(&FakePortal::default(), "2\n\n5\n").await;
        assert!(out.contains("No upcoming events found."));
    }

    #[tokio::test]
    async fn handler_errors_keep_menu_running() {
        let portal = FakePortal {
            fail_events: true,
            ..Default::default()
        };
        let out = run_menu(&portal, "2\n\n5\n").await;
        assert!(out.contains("Error listing events: configuration error: connection lost"));
        assert!(out.contains("Exiting..."));
    }

    /// Counts events at WARN or above
    struct WarnCounter(std::sync::Arc<std::sync::atomic::AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCounter {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            if *event.metadata().level() <= tracing::Level::WARN {
                self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            }
        }
    }

    #[tokio::test]
    async fn handler_errors_are_not_logged_as_warnings() {
        use tracing_subscriber::layer::SubscriberExt;

        let warnings = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let portal = FakePortal {
            fail_events: true,
            ..Default::default()
        };
        let out = run_menu(&portal, "2\n\n5\n").await;
        assert!(out.contains("Error listing events"));

        let portal = FakePortal {
            citizens: sample_citizens(),
            reject_enrollment: Some("Evento lotado".into()),
            ..Default::default()
        };
        let out = run_menu(&portal, "3\n4\n12\n\n5\n").await;
        assert!(out.contains("ENROLLMENT ERROR: Evento lotado"));

        assert_eq!(warnings.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn enrollment_prints_database_notices() {
        let portal = FakePortal {
            events: vec![sample_event()],
            citizens: sample_citizens(),
            notices: vec!["Inscrição realizada. Vagas restantes: 119".into()],
            ..Default::default()
        };
        let out = run_menu(&portal, "3\n4\n12\n\n5\n").await;

        assert!(out.contains("12    | Ana Souza"));
        assert!(out.contains("Trying to enroll citizen 12 in event 4..."));
        assert!(out.contains("DATABASE NOTICE: Inscrição realizada. Vagas restantes: 119"));

        let enrollments = portal.enrollments.lock().unwrap();
        assert_eq!(
            *enrollments,
            vec![Enrollment {
                citizen_id: 12,
                event_id: 4,
                ticket: TicketType::default(),
            }]
        );
    }

    #[tokio::test]
    async fn enrollment_rejects_non_integer_ids() {
        let portal = FakePortal {
            citizens: sample_citizens(),
            ..Default::default()
        };
        let out = run_menu(&portal, "3\nfour\n\n5\n").await;
        assert!(out.contains("Citizen and event IDs must be integers."));
        assert!(portal.enrollments.lock().unwrap().is_empty());

        let out = run_menu(&portal, "3\n4\nAna\n\n5\n").await;
        assert!(out.contains("Citizen and event IDs must be integers."));
        assert!(portal.enrollments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn enrollment_without_citizens_stops_early() {
        let out = run_menu(&FakePortal::default(), "3\n4\n\n5\n").await;
        assert!(out.contains("No citizens registered."));
        assert!(!out.contains("Trying to enroll"));
    }

    #[tokio::test]
    async fn procedure_rejection_is_reported() {
        let portal = FakePortal {
            citizens: sample_citizens(),
            reject_enrollment: Some("Evento sem vagas disponíveis".into()),
            ..Default::default()
        };
        let out = run_menu(&portal, "3\n4\n12\n\n5\n").await;
        assert!(out.contains("ENROLLMENT ERROR: Evento sem vagas disponíveis"));
        assert!(out.contains("Exiting..."));
    }

    #[tokio::test]
    async fn popularity_report_table() {
        let portal = FakePortal {
            report: vec![EventPopularity {
                rank: 1,
                id: 4,
                name: "Festival de Jazz".into(),
                total_enrolled: 180,
            }],
            ..Default::default()
        };
        let out = run_menu(&portal, "4\n\n5\n").await;
        assert!(out.contains("Management Report - Most Popular Events"));
        assert!(out.contains("180"));

        let out = run_menu(&FakePortal::default(), "4\n\n5\n").await;
        assert!(out.contains("No events found for the report."));
    }
}
