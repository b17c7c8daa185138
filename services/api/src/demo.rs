use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::Args;

use union_portal::auth::{
    AdminCredentials, Credentials, OtpPolicy, OtpService, SessionGate,
};
use union_portal::error::AppError;
use union_portal::extraction::{DocumentExtractor, ExtractedFinancials, FinancialDraft};
use union_portal::unions::domain::{
    DocumentCategory, DocumentDescriptor, FinancialSnapshot, OwnerId, UnionSubmission,
};
use union_portal::unions::report::{render_audit_report, write_roster_csv};
use union_portal::unions::{EligibilityEvaluator, RegistrationDecision, UnionRegistryService};

use crate::infra::{
    default_eligibility_config, DevSmsSender, InMemoryUnionRegistry, StaticDocumentExtractor,
};

#[derive(Args, Debug)]
pub(crate) struct EligibilityArgs {
    /// Annual revenue in rial
    #[arg(long)]
    pub(crate) annual_revenue: u64,
    /// Total assets in rial
    #[arg(long)]
    pub(crate) total_assets: u64,
    /// Registered member head-count
    #[arg(long)]
    pub(crate) member_count: u32,
    /// Whether the union receives government financial support
    #[arg(long)]
    pub(crate) government_support: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Write the resulting union roster to a CSV file
    #[arg(long)]
    pub(crate) export_csv: Option<PathBuf>,
}

pub(crate) fn run_eligibility(args: EligibilityArgs) -> Result<(), AppError> {
    let snapshot = FinancialSnapshot {
        annual_revenue: args.annual_revenue,
        total_assets: args.total_assets,
        member_count: args.member_count,
        government_support: args.government_support,
    };

    let evaluator = EligibilityEvaluator::new(default_eligibility_config());
    let breakdown = evaluator.breakdown(&snapshot);
    let determination = evaluator.determine(&snapshot);

    println!("Audit-requirement criteria");
    for assessment in &breakdown {
        let met = if assessment.met { "met" } else { "not met" };
        println!(
            "- {}: {} (threshold {}) -> {met}",
            assessment.criterion.label(),
            assessment.current,
            assessment.threshold,
        );
    }
    println!("\nDetermination: {}", determination.label());

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Union registration portal demo");

    let registry = Arc::new(InMemoryUnionRegistry::default());
    let sender = Arc::new(DevSmsSender::default());
    let gate = SessionGate::new(AdminCredentials::default());
    let otp = OtpService::new(sender.clone(), OtpPolicy::default());
    let service = UnionRegistryService::new(registry, default_eligibility_config());

    // registrant signs in with the SMS one-time code
    let registrant = Credentials {
        phone_number: "09123456789".to_string(),
        national_id: "0084575948".to_string(),
    };
    if let Err(err) = otp.send_code(&registrant, Utc::now()) {
        println!("  Code delivery failed: {err}");
        return Ok(());
    }
    let code = match sender.last_code_for(&registrant.phone_number) {
        Some(code) => code,
        None => {
            println!("  Dev sender kept no code");
            return Ok(());
        }
    };
    if let Err(err) = otp.verify_code(&registrant, &code, Utc::now()) {
        println!("  Code verification failed: {err}");
        return Ok(());
    }
    let union_session = gate.establish(&registrant, Utc::now());
    println!(
        "- Registrant signed in as {} actor",
        union_session.subject.role.label()
    );

    let owner = OwnerId(union_session.subject.national_id.clone());
    let record = match service.register(
        owner.clone(),
        &union_session.subject.phone_number,
        UnionSubmission {
            name: "Bakers Guild of the Northern District".to_string(),
            head_of_union: "R. Ahmadi".to_string(),
            region: "Tehran".to_string(),
            economic_code: "1234567890".to_string(),
            fiscal_year: "1404".to_string(),
            code: "UN-1024".to_string(),
        },
        Utc::now(),
    ) {
        Ok(record) => record,
        Err(err) => {
            println!("  Registration rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- Registered union {} ({}) -> {}",
        record.name,
        record.code,
        record.registration_status.label()
    );

    // the reserved pair signs in and carries the admin claim
    let admin = Credentials {
        phone_number: "09000000000".to_string(),
        national_id: "0000000000".to_string(),
    };
    let admin_session = gate.establish(&admin, Utc::now());
    println!(
        "- Reviewer signed in as {} actor",
        admin_session.subject.role.label()
    );

    let approved = match service.decide(record.id, RegistrationDecision::Approve, Utc::now()) {
        Ok(record) => record,
        Err(err) => {
            println!("  Approval failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- Registration approved at {}",
        approved
            .approved_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_default()
    );

    // documents go through the extraction stand-in, then get confirmed
    let documents = vec![DocumentDescriptor {
        name: "balance-1404.pdf".to_string(),
        category: DocumentCategory::BalanceSheet,
        storage_key: "uploads/un-1024/balance-1404.pdf".to_string(),
    }];
    let extractor = StaticDocumentExtractor::with_figures(ExtractedFinancials {
        annual_revenue: Some(6_000_000_000),
        total_revenue: Some(1_000_000_000),
        member_count: Some(10),
    });
    let snapshot = match extractor
        .extract(&documents)
        .and_then(FinancialDraft::from_extraction)
    {
        Ok(mut draft) => {
            println!("- Extraction draft received; figures confirmed by the registrant");
            draft.confirm_all();
            draft.set_government_support(false);
            match draft.snapshot() {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    println!("  Draft incomplete: {err}");
                    return Ok(());
                }
            }
        }
        Err(err) => {
            println!("  Extraction unavailable ({err}); falling back to manual figures");
            FinancialSnapshot {
                annual_revenue: 6_000_000_000,
                total_assets: 1_000_000_000,
                member_count: 10,
                government_support: false,
            }
        }
    };

    let updated = match service.submit_financial_data(&owner, snapshot, documents) {
        Ok(record) => record,
        Err(err) => {
            println!("  Financial submission failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- Financial data recorded -> audit status {}",
        updated.audit_status.label()
    );

    match service.eligibility_report(&owner) {
        Ok(Some(report)) => {
            println!("\n{}", render_audit_report(&updated, &report));
        }
        Ok(None) => println!("  Financial data not available"),
        Err(err) => println!("  Assessment unavailable: {err}"),
    }

    match service.stats() {
        Ok(stats) => {
            println!("\nRegistry counters");
            println!("- total: {}", stats.total);
            println!("- pending approval: {}", stats.pending_approval);
            println!("- approved: {}", stats.approved);
            println!("- rejected: {}", stats.rejected);
            println!(
                "- audit required / not required / pending: {} / {} / {}",
                stats.audit_required, stats.audit_not_required, stats.audit_pending
            );
        }
        Err(err) => println!("  Stats unavailable: {err}"),
    }

    if let Some(path) = args.export_csv {
        let records = match service.list_unions() {
            Ok(records) => records,
            Err(err) => {
                println!("  Export unavailable: {err}");
                return Ok(());
            }
        };
        let file = File::create(&path)?;
        write_roster_csv(&records, file)?;
        println!("\nRoster exported to {}", path.display());
    }

    Ok(())
}
