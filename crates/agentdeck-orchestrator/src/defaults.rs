use crate::catalog::{AgentCategory, Catalog, UnitDescriptor};
use agentdeck_core::AgentdeckResult;

/// The dashboard's built-in agent catalog.
///
/// Every dependency points at an agent of an earlier category, so all edges
/// are resolvable by category order alone.
pub fn default_descriptors() -> Vec<UnitDescriptor> {
    let mut descriptors = Vec::with_capacity(30);
    descriptors.extend(compliance_agents());
    descriptors.extend(risk_agents());
    descriptors.extend(business_agents());
    descriptors.extend(infrastructure_agents());
    descriptors.extend(content_agents());
    descriptors.extend(strategic_agents());
    descriptors.extend(life_agents());
    descriptors
}

/// [`default_descriptors`] as a [`Catalog`].
pub fn default_catalog() -> AgentdeckResult<Catalog> {
    Catalog::new(default_descriptors())
}

fn compliance_agents() -> Vec<UnitDescriptor> {
    use AgentCategory::Compliance;
    vec![
        UnitDescriptor::new("security-audit", "Security Audit", Compliance),
        UnitDescriptor::new("gdpr-compliance", "GDPR Compliance", Compliance),
        UnitDescriptor::new("license-audit", "License Audit", Compliance),
        UnitDescriptor::new("access-review", "Access Review", Compliance),
    ]
}

fn risk_agents() -> Vec<UnitDescriptor> {
    use AgentCategory::Risk;
    vec![
        UnitDescriptor::new("fraud-detection", "Fraud Detection", Risk)
            .with_dependencies(["security-audit"]),
        UnitDescriptor::new("credit-risk", "Credit Risk", Risk),
        UnitDescriptor::new("vendor-risk", "Vendor Risk", Risk).with_dependencies(["license-audit"]),
        UnitDescriptor::new("backup-monitor", "Backup Monitor", Risk)
            .with_dependencies(["security-audit"]),
    ]
}

fn business_agents() -> Vec<UnitDescriptor> {
    use AgentCategory::Business;
    vec![
        UnitDescriptor::new("billing", "Billing", Business).with_dependencies(["fraud-detection"]),
        UnitDescriptor::new("crm-sync", "CRM Sync", Business).with_dependencies(["gdpr-compliance"]),
        UnitDescriptor::new("invoice-reconciliation", "Invoice Reconciliation", Business)
            .with_dependencies(["credit-risk"]),
        UnitDescriptor::new("sales-forecast", "Sales Forecast", Business),
        UnitDescriptor::new("inventory", "Inventory", Business),
    ]
}

fn infrastructure_agents() -> Vec<UnitDescriptor> {
    use AgentCategory::Infrastructure;
    vec![
        UnitDescriptor::new("uptime-monitor", "Uptime Monitor", Infrastructure),
        UnitDescriptor::new("backup-scheduler", "Backup Scheduler", Infrastructure)
            .with_dependencies(["backup-monitor"]),
        UnitDescriptor::new("cost-optimizer", "Cost Optimizer", Infrastructure)
            .with_dependencies(["billing"]),
        UnitDescriptor::new("ssl-monitor", "SSL Monitor", Infrastructure)
            .with_dependencies(["security-audit"]),
        UnitDescriptor::new("log-analyzer", "Log Analyzer", Infrastructure),
    ]
}

fn content_agents() -> Vec<UnitDescriptor> {
    use AgentCategory::Content;
    vec![
        UnitDescriptor::new("seo-audit", "SEO Audit", Content),
        UnitDescriptor::new("content-scoring", "Content Scoring", Content),
        UnitDescriptor::new("social-media", "Social Media", Content).with_dependencies(["crm-sync"]),
        UnitDescriptor::new("newsletter", "Newsletter", Content)
            .with_dependencies(["crm-sync", "gdpr-compliance"]),
    ]
}

fn strategic_agents() -> Vec<UnitDescriptor> {
    use AgentCategory::Strategic;
    vec![
        UnitDescriptor::new("competitor-analysis", "Competitor Analysis", Strategic)
            .with_dependencies(["seo-audit"]),
        UnitDescriptor::new("market-trends", "Market Trends", Strategic),
        UnitDescriptor::new("okr-tracker", "OKR Tracker", Strategic)
            .with_dependencies(["sales-forecast", "billing"]),
        UnitDescriptor::new("kpi-digest", "KPI Digest", Strategic)
            .with_dependencies(["billing", "uptime-monitor"]),
    ]
}

fn life_agents() -> Vec<UnitDescriptor> {
    use AgentCategory::Life;
    vec![
        UnitDescriptor::new("travel-advisory", "Travel Advisory", Life),
        UnitDescriptor::new("health-tracker", "Health Tracker", Life),
        UnitDescriptor::new("personal-finance", "Personal Finance", Life)
            .with_dependencies(["credit-risk"]),
        UnitDescriptor::new("habit-coach", "Habit Coach", Life).disabled(),
    ]
}
