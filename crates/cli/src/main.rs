use clap::{Parser, Subcommand};
use nuskha_core::constants::{DEFAULT_CLINIC_NAME, DEFAULT_DATABASE_PATH};
use nuskha_core::dto::{ListPrescriptionsQuery, Prescription};
use nuskha_core::suggestions::analyze_symptoms;
use nuskha_core::{ClinicInfo, CoreConfig, Services, SuggestionService};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nuskha")]
#[command(about = "Nuskha prescription management CLI")]
struct Cli {
    /// SQLite database file (default: $NUSKHA_DATABASE_PATH or nuskha.db)
    #[arg(long, global = true)]
    database: Option<PathBuf>,
    /// TrueType font for Dari text in PDFs (default: $NUSKHA_PDF_FONT)
    #[arg(long, global = true)]
    font: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List prescriptions, newest first
    List {
        /// Filter by patient name, diagnosis or prescription number
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Show one prescription with its medicines
    Show {
        /// Prescription id
        id: String,
    },
    /// Render a prescription to PDF
    Pdf {
        /// Prescription id
        id: String,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Suggest diagnoses and medicines for symptoms using the local dictionary
    Analyze {
        /// Free-text symptoms (Dari or English)
        symptoms: String,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        gender: Option<String>,
    },
    /// List medicines usually prescribed for a diagnosis
    Medicines {
        diagnosis: String,
    },
    /// List saved presets
    Presets,
    /// Show prescription statistics
    Stats,
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

fn services(cli: &Cli) -> Result<Services, Box<dyn std::error::Error>> {
    let database = cli
        .database
        .clone()
        .or_else(|| env_path("NUSKHA_DATABASE_PATH"))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));
    let font = cli.font.clone().or_else(|| env_path("NUSKHA_PDF_FONT"));
    let clinic_name =
        std::env::var("NUSKHA_CLINIC_NAME").unwrap_or_else(|_| DEFAULT_CLINIC_NAME.into());
    let clinic = ClinicInfo::new(
        clinic_name,
        std::env::var("NUSKHA_CLINIC_ADDRESS").ok(),
        std::env::var("NUSKHA_CLINIC_PHONE").ok(),
    )?;

    let cfg = CoreConfig::new(database, None, font, clinic)?;
    Ok(Services::from_config(&cfg)?)
}

fn print_prescription(p: &Prescription) {
    println!("{}  {}", p.prescription_number, p.prescription_date);
    let age = p.patient_age.map(|a| format!(", {a}")).unwrap_or_default();
    println!("Patient:   {}{}", p.patient_name, age);
    println!("Diagnosis: {}", p.diagnosis);
    if let Some(doctor) = &p.doctor_name {
        println!("Doctor:    {doctor}");
    }
    for (i, m) in p.medicines.iter().enumerate() {
        let details: Vec<&str> = [
            m.dosage.as_deref(),
            m.frequency.as_deref(),
            m.duration.as_deref(),
            m.route.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        println!("  {}. {}  {}", i + 1, m.name, details.join(" | "));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run(&Cli::parse())
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Some(Commands::List {
            search,
            limit,
            offset,
        }) => {
            let page = services(cli)?.prescriptions.list(ListPrescriptionsQuery {
                search: search.clone(),
                limit: Some(*limit),
                offset: Some(*offset),
            })?;
            if page.items.is_empty() {
                println!("No prescriptions found.");
            }
            for item in &page.items {
                println!(
                    "ID: {}, No: {}, Patient: {}, Diagnosis: {}, Medicines: {}, Date: {}",
                    item.id,
                    item.prescription_number,
                    item.patient_name,
                    item.diagnosis,
                    item.medicine_count,
                    item.prescription_date
                );
            }
            println!("{} of {} shown", page.items.len(), page.total);
        }
        Some(Commands::Show { id }) => match services(cli)?.prescriptions.get(id) {
            Ok(p) => print_prescription(&p),
            Err(e) => eprintln!("Error reading prescription: {}", e),
        },
        Some(Commands::Pdf { id, out }) => {
            let result = services(cli)?
                .prescriptions
                .render_pdf(id)
                .and_then(|pdf| pdf.write_to(out));
            match result {
                Ok(path) => println!("Wrote {}", path.display()),
                Err(e) => eprintln!("Error rendering PDF: {}", e),
            }
        }
        Some(Commands::Analyze {
            symptoms,
            age,
            gender,
        }) => {
            let res = analyze_symptoms(symptoms, *age, gender.as_deref());
            if res.diagnoses.is_empty() {
                println!("No matching conditions.");
            }
            for d in &res.diagnoses {
                println!(
                    "{} ({}, {}) confidence {:.2} [{}]",
                    d.name,
                    d.name_en.as_deref().unwrap_or("-"),
                    d.icd_code.as_deref().unwrap_or("-"),
                    d.confidence,
                    d.matched_keywords.join(", ")
                );
            }
            for m in &res.medications {
                println!("  Rx: {} {} {} {}", m.name, m.dosage, m.frequency, m.route);
            }
            for r in &res.recommendations {
                println!("  * {r}");
            }
        }
        Some(Commands::Medicines { diagnosis }) => {
            match SuggestionService::local().medicines_for_diagnosis(diagnosis) {
                Ok(medicines) if medicines.is_empty() => println!("No medicines found."),
                Ok(medicines) => {
                    for m in medicines {
                        println!("{} {} {} {}", m.name, m.dosage, m.frequency, m.route);
                    }
                }
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        Some(Commands::Presets) => {
            let presets = services(cli)?.presets.list()?;
            if presets.is_empty() {
                println!("No presets found.");
            }
            for p in presets {
                let names: Vec<&str> = p.medicines.iter().map(|m| m.name.as_str()).collect();
                println!("ID: {}, Name: {}, Medicines: {}", p.id, p.name, names.join(", "));
            }
        }
        Some(Commands::Stats) => {
            let stats = services(cli)?.prescriptions.stats()?;
            println!("Prescriptions: {}", stats.total_prescriptions);
            println!("Today:         {}", stats.prescriptions_today);
            println!("Medicines:     {}", stats.total_medicines);
            for d in stats.top_diagnoses {
                println!("  {} ({})", d.diagnosis, d.count);
            }
        }
        None => {
            println!("Use 'nuskha --help' for commands");
        }
    }

    Ok(())
}
