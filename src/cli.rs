//! Command-line front end. Every command is a thin call into the stores
//! followed by rendering.

use std::io::Write;
use std::path::PathBuf;

use clap::Subcommand;
use prettytable::{row, Table};
use time::{macros::format_description, OffsetDateTime};

use crate::backup::Backup;
use crate::config::ExportConfig;
use crate::context::Alinea;
use crate::error::Result;
use crate::models::{
    Account, AccountPatch, Category, NewAccount, Report, ReportDraft, ReportPatch, ReportStatus,
    ReportType, Role, WeekNumber,
};
use crate::validation::{validate_new_account, validate_report_patch};
use crate::views::{recent, visible_reports, DivisionSummary, ReportFilter, StatusCounts};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the session
    Login { username: String, password: String },
    /// Forget the remembered session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Manage accounts (admin only)
    #[command(subcommand)]
    Users(UsersCommand),
    #[command(subcommand)]
    Reports(ReportsCommand),
    #[command(subcommand)]
    Export(ExportCommand),
    /// Write a backup of accounts and reports (admin only)
    Backup,
    /// Replace all accounts and reports from a backup file (admin only)
    Restore { file: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    List,
    Add {
        username: String,
        password: String,
        #[arg(long)]
        role: Role,
        #[arg(long)]
        display_name: String,
        #[arg(long)]
        division: String,
    },
    Update {
        id: String,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long)]
        division: Option<String>,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ReportsCommand {
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long = "type", default_value = "weekly")]
        report_type: ReportType,
        #[arg(long, default_value = "1")]
        week: WeekNumber,
        #[arg(long, default_value = "other")]
        category: Category,
        #[arg(long, default_value = "draft")]
        status: ReportStatus,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long = "type")]
        report_type: Option<ReportType>,
        #[arg(long)]
        week: Option<WeekNumber>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        status: Option<ReportStatus>,
    },
    Delete { id: String },
    Show { id: String },
    /// Reports visible to the signed-in account, newest first
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<ReportStatus>,
        #[arg(long = "type")]
        report_type: Option<ReportType>,
    },
    /// Reports created by the signed-in account
    Mine,
    /// Per-division totals (admin only)
    Summary,
    /// Status counts and the five newest visible reports
    Dashboard,
}

#[derive(Subcommand, Debug)]
pub enum ExportCommand {
    One { id: String },
    /// Every report as one table (admin only)
    All,
}

fn account_table(accounts: &[Account]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Id", "Username", "Role", "Display name", "Division"]);
    for a in accounts {
        table.add_row(row![a.id, a.username, a.role, a.display_name, a.division]);
    }
    table
}

fn report_table(reports: &[&Report]) -> Result<Table> {
    let format = format_description!("[day] [month repr:short] [year]");
    let mut table = Table::new();
    table.set_titles(row!["Id", "Title", "Type", "Division", "Author", "Status", "Created"]);
    for r in reports {
        let created = r.created_at.format(format)?;
        table.add_row(row![r.id, r.title, r.type_label(), r.division, r.author_name, r.status, created]);
    }
    Ok(table)
}

pub fn run(app: &mut Alinea, command: Command, export: &ExportConfig, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            let account = app.users.login(&username, &password)?;
            writeln!(out, "Signed in as {} ({})", account.display_name, account.role)?;
        }
        Command::Logout => {
            app.users.logout()?;
            writeln!(out, "Signed out")?;
        }
        Command::Whoami => match app.users.current_user() {
            Some(a) => writeln!(out, "{} ({}, {} division)", a.username, a.role, a.division)?,
            None => writeln!(out, "Not signed in")?,
        },
        Command::Users(cmd) => {
            app.require_admin()?;
            run_users(app, cmd, out)?;
        }
        Command::Reports(cmd) => run_reports(app, cmd, out)?,
        Command::Export(cmd) => run_export(app, cmd, export, out)?,
        Command::Backup => {
            app.require_admin()?;
            let backup = app.users.backup()?;
            let path = export.output_dir.join(Backup::file_name(OffsetDateTime::now_utc()));
            std::fs::create_dir_all(&export.output_dir)?;
            std::fs::write(&path, backup.to_json()?)?;
            writeln!(out, "Backup written to {}", path.display())?;
        }
        Command::Restore { file } => {
            app.require_admin()?;
            let text = std::fs::read_to_string(&file)?;
            app.restore(&text)?;
            writeln!(out, "Data restored from {}", file.display())?;
        }
    }
    Ok(())
}

fn run_users(app: &mut Alinea, cmd: UsersCommand, out: &mut impl Write) -> Result<()> {
    match cmd {
        UsersCommand::List => {
            write!(out, "{}", account_table(app.users.accounts()))?;
        }
        UsersCommand::Add { username, password, role, display_name, division } => {
            let new_account = NewAccount { username, password, role, display_name, division };
            validate_new_account(&new_account)?;
            let account = app.users.add_account(new_account)?;
            writeln!(out, "Added account {}", account.id)?;
        }
        UsersCommand::Update { id, username, password, role, display_name, division } => {
            let patch = AccountPatch { username, password, role, display_name, division };
            if app.users.update_account(&id, &patch)? {
                writeln!(out, "Updated account {}", id)?;
            } else {
                writeln!(out, "Account not found")?;
            }
        }
        UsersCommand::Delete { id } => {
            if app.users.delete_account(&id)? {
                writeln!(out, "Deleted account {}", id)?;
            } else {
                writeln!(out, "Account not found")?;
            }
        }
    }
    Ok(())
}

fn run_reports(app: &mut Alinea, cmd: ReportsCommand, out: &mut impl Write) -> Result<()> {
    let viewer = app.require_user()?.clone();
    match cmd {
        ReportsCommand::Create { title, content, report_type, week, category, status } => {
            let draft = ReportDraft {
                title,
                content,
                report_type,
                week_number: (report_type == ReportType::Weekly).then_some(week),
                category: Some(category),
                status,
            };
            let report = app.submit_report(draft)?;
            writeln!(out, "Created report {}", report.id)?;
        }
        ReportsCommand::Update { id, title, content, report_type, week, category, status } => {
            let patch = ReportPatch { title, content, report_type, week_number: week, category, status };
            validate_report_patch(&patch, viewer.role)?;
            match app.reports.update_report(&id, &patch)? {
                Some(report) => writeln!(out, "Updated report {} ({})", report.id, report.status)?,
                None => writeln!(out, "Report not found")?,
            }
        }
        ReportsCommand::Delete { id } => {
            if app.reports.delete_report(&id)? {
                writeln!(out, "Deleted report {}", id)?;
            } else {
                writeln!(out, "Report not found")?;
            }
        }
        ReportsCommand::Show { id } => match app.reports.get_by_id(&id) {
            Some(report) => write!(out, "{}", app.reports.export_single_as_document(report)?.body)?,
            None => writeln!(out, "Report not found")?,
        },
        ReportsCommand::List { search, status, report_type } => {
            let filter = ReportFilter { search, status, report_type };
            let visible = visible_reports(&viewer, app.reports.reports());
            let listed = filter.apply(visible);
            if listed.is_empty() {
                if filter.is_active() {
                    writeln!(out, "No reports match the current filters")?;
                } else {
                    writeln!(out, "No reports yet")?;
                }
            } else {
                write!(out, "{}", report_table(&listed)?)?;
            }
        }
        ReportsCommand::Mine => {
            let mine = app.reports.list_by_account(&viewer.id);
            write!(out, "{}", report_table(&mine)?)?;
        }
        ReportsCommand::Summary => {
            app.require_admin()?;
            write!(out, "{}", DivisionSummary::build(app.reports.reports()))?;
        }
        ReportsCommand::Dashboard => {
            let visible = visible_reports(&viewer, app.reports.reports());
            write!(out, "{}", StatusCounts::tally(visible.iter().copied()))?;
            write!(out, "{}", report_table(&recent(visible, 5))?)?;
        }
    }
    Ok(())
}

fn run_export(app: &mut Alinea, cmd: ExportCommand, export: &ExportConfig, out: &mut impl Write) -> Result<()> {
    app.require_user()?;
    let document = match cmd {
        ExportCommand::One { id } => match app.reports.get_by_id(&id) {
            Some(report) => app.reports.export_single_as_document(report)?,
            None => {
                writeln!(out, "Report not found")?;
                return Ok(());
            }
        },
        ExportCommand::All => {
            app.require_admin()?;
            app.reports.export_all_as_document()?
        }
    };
    let path = document.save(&export.output_dir)?;
    writeln!(out, "Saved {}", path.display())?;
    Ok(())
}
