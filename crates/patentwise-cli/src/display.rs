//! Vertical card display for risk reports, dashboards and admin listings.

use patentwise_app::Dashboard;
use patentwise_app::workflow::Recap;
use patentwise_core::{Alert, DomainKeywords, SystemLog, UserAccount};
use patentwise_risk::{DistributionView, RiskReport, TieredScore};

const MAX_LIST_ITEMS: usize = 10;

// ── Public API ──

/// Print a risk report grouped into sections.
pub fn print_report_card(report: &RiskReport, alerts: &[Alert]) {
    println!("=== Analysis {} ===", report.submission_id);
    println!("Headline risk: {}", report.headline_tier());
    println!();

    println!("Scores");
    print_score("overall risk", &report.overall);
    print_score("novelty", &report.novelty);
    print_score("technical overlap", &report.technical_overlap);
    println!();

    if !report.prior_art.is_empty() {
        println!("Prior Art ({})", report.prior_art.len());
        for m in report.prior_art.iter().take(MAX_LIST_ITEMS) {
            let title = m.title.as_deref().unwrap_or("");
            println!(
                "  {:<16} {:>4}% match  {:<8} {}",
                m.patent_id,
                m.similarity.percent(),
                m.similarity.tier,
                title
            );
            if !m.matched_claims.is_empty() {
                let claims: Vec<String> = m.matched_claims.iter().map(|c| c.to_string()).collect();
                println!("    claims: {}", claims.join(", "));
            }
            if !m.key_overlap.is_empty() {
                println!("    overlap: {}", m.key_overlap.join(", "));
            }
        }
        print_overflow(report.prior_art.len());
        let assessment = &report.prior_art_assessment;
        println!(
            "  {:<26} {} ({} at or above threshold, top-3 average {:.0}%)",
            "landscape",
            assessment.tier,
            assessment.high_similarity_count,
            assessment.average_similarity * 100.0
        );
        for factor in &assessment.risk_factors {
            println!("    - {factor}");
        }
        println!();
    }

    if !report.infringement.is_empty() {
        println!("Infringement Risks ({})", report.infringement.len());
        for r in report.infringement.iter().take(MAX_LIST_ITEMS) {
            println!(
                "  {:<16} {:>4}%  {:<8} {}",
                r.patent_id,
                r.risk.percent(),
                r.risk.tier,
                r.owner
            );
            for element in &r.conflicting_elements {
                println!("    - {element}");
            }
        }
        print_overflow(report.infringement.len());
        println!();
    }

    println!("Domain Distribution");
    match &report.distribution {
        DistributionView::Known { shares } => {
            for share in shares {
                println!("  {:<26} {:.1}%", share.domain, share.percentage);
            }
        }
        DistributionView::Unknown { reason } => println!("  unknown ({reason})"),
    }
    println!();

    if !report.invalid_scores.is_empty() {
        println!("Out-of-range Scores");
        for field in &report.invalid_scores {
            println!("  {field}");
        }
        println!();
    }

    if !alerts.is_empty() {
        println!("Alerts");
        print_alert_lines(alerts);
    }
}

pub fn print_dashboard(name: &str, dashboard: &Dashboard) {
    println!("=== Dashboard: {name} ===");
    println!();

    let m = &dashboard.metrics;
    println!("Summary");
    println!("  {:<26} {}", "submissions", m.total_submissions);
    println!("  {:<26} {}", "pending analysis", m.pending_count);
    println!("  {:<26} {}", "unread alerts", m.unread_alert_count);
    println!();

    if !dashboard.submissions.is_empty() {
        println!("Submissions");
        for record in dashboard.submissions.iter().take(MAX_LIST_ITEMS) {
            let s = &record.submission;
            println!(
                "  {:<12} {:<16} {:<26} {}",
                s.submitted_at.format("%Y-%m-%d"),
                record.status.as_str(),
                s.domain.label(),
                s.title
            );
        }
        print_overflow(dashboard.submissions.len());
        println!();
    }

    if !dashboard.alerts.is_empty() {
        println!("Alerts");
        print_alert_lines(&dashboard.alerts);
    }
}

pub fn print_recap(recap: &Recap) {
    println!("Review & Submit");
    println!("  {:<26} {}", "title", recap.title);
    println!("  {:<26} {}", "description", recap.description);
    if let Some(inventors) = &recap.inventors {
        println!("  {:<26} {}", "inventors", inventors);
    }
    if let Some(domain) = &recap.domain {
        println!("  {:<26} {}", "domain", domain);
    }
    if let Some(document) = &recap.document {
        println!("  {:<26} {}", "document", document);
    }
    if let Some(text) = &recap.text_preview {
        println!("  {:<26} {}", "text", text);
    }
}

pub fn print_users(users: &[UserAccount]) {
    println!("Users ({})", users.len());
    for u in users {
        let last_login = u
            .last_login
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".into());
        println!(
            "  {:<4} {:<28} {:<18} {:<9} {:<8} {}",
            u.id,
            u.email,
            u.name,
            u.role,
            u.status.as_str(),
            last_login
        );
    }
}

pub fn print_keywords(entries: &[DomainKeywords]) {
    println!("Domain Keywords ({})", entries.len());
    for entry in entries {
        println!("  {} [{}]", entry.domain, entry.domain_id);
        println!("    {}", list_preview(&entry.keywords));
    }
}

pub fn print_logs(logs: &[SystemLog]) {
    println!("System Logs ({})", logs.len());
    for log in logs {
        println!(
            "  {:<20} {:<8} {:<12} {}",
            log.timestamp.format("%Y-%m-%d %H:%M:%S"),
            log.level,
            log.service,
            log.message
        );
    }
}

// ── Helpers ──

fn print_score(label: &str, score: &TieredScore) {
    println!("  {:<26} {:>4}%  {}", label, score.percent(), score.tier);
}

fn print_alert_lines(alerts: &[Alert]) {
    for a in alerts.iter().take(MAX_LIST_ITEMS) {
        let marker = if a.read { " " } else { "*" };
        println!(
            "  {marker} {:<12} {:<16} {}",
            a.created_at.format("%Y-%m-%d"),
            a.kind.as_str(),
            a.message
        );
    }
    print_overflow(alerts.len());
}

fn print_overflow(len: usize) {
    if len > MAX_LIST_ITEMS {
        println!("    ... and {} more", len - MAX_LIST_ITEMS);
    }
}

/// Comma-joined list, cut after `MAX_LIST_ITEMS`.
fn list_preview(items: &[String]) -> String {
    let shown: Vec<&str> = items.iter().take(MAX_LIST_ITEMS).map(String::as_str).collect();
    let mut out = shown.join(", ");
    if items.len() > MAX_LIST_ITEMS {
        out.push_str(&format!(" (+{} more)", items.len() - MAX_LIST_ITEMS));
    }
    out
}
