use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ServiceCategory;

/// A single entry in a category's service catalog
///
/// Catalog entries are static offering data. Nothing computes over the
/// descriptive metadata (`estimated_time`, `frequency`, `includes`); it is
/// carried for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub label: String,
    pub description: String,
    pub price: Decimal,
    pub has_variable_price: bool,
    pub min_price: Option<Decimal>,
    pub category: ServiceCategory,
    pub estimated_time: Option<String>,
    pub frequency: Vec<String>,
    pub includes: Vec<String>,
}

impl CatalogEntry {
    fn fixed(
        category: ServiceCategory,
        id: &str,
        label: &str,
        description: &str,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            price,
            has_variable_price: false,
            min_price: None,
            category,
            estimated_time: None,
            frequency: Vec::new(),
            includes: Vec::new(),
        }
    }

    fn variable(
        category: ServiceCategory,
        id: &str,
        label: &str,
        description: &str,
        price: Decimal,
        min_price: Decimal,
    ) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            price,
            has_variable_price: true,
            min_price: Some(min_price),
            category,
            estimated_time: None,
            frequency: Vec::new(),
            includes: Vec::new(),
        }
    }

    fn with_estimated_time(mut self, estimated_time: &str) -> Self {
        self.estimated_time = Some(estimated_time.to_string());
        self
    }

    fn with_frequency(mut self, frequency: &[&str]) -> Self {
        self.frequency = frequency.iter().map(|f| f.to_string()).collect();
        self
    }

    fn with_includes(mut self, includes: &[&str]) -> Self {
        self.includes = includes.iter().map(|i| i.to_string()).collect();
        self
    }
}

/// The read-only service catalog for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub category: ServiceCategory,
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Look up an entry by id
    pub fn find(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// KRA compliance services
    pub fn kra() -> Self {
        let category = ServiceCategory::Kra;
        Self {
            category,
            entries: vec![
                CatalogEntry::fixed(
                    category,
                    "kra-pin-registration",
                    "KRA PIN Registration",
                    "Registration of a new personal or company KRA PIN",
                    Decimal::new(1500, 0),
                )
                .with_estimated_time("1-2 business days")
                .with_frequency(&["one-off"])
                .with_includes(&["iTax account setup", "PIN certificate"]),
                CatalogEntry::fixed(
                    category,
                    "tax-returns-filing",
                    "Tax Returns Filing",
                    "Preparation and filing of individual or company returns",
                    Decimal::new(2500, 0),
                )
                .with_estimated_time("2-3 business days")
                .with_frequency(&["annual", "monthly"])
                .with_includes(&["Return preparation", "iTax submission", "Acknowledgement slip"]),
                CatalogEntry::fixed(
                    category,
                    "tax-compliance-certificate",
                    "Tax Compliance Certificate",
                    "Application and follow-up for a tax compliance certificate",
                    Decimal::new(2000, 0),
                )
                .with_estimated_time("3-5 business days")
                .with_frequency(&["annual"]),
                CatalogEntry::variable(
                    category,
                    "kra-penalty-waiver",
                    "Penalty Waiver Application",
                    "Waiver application for accrued penalties and interest",
                    Decimal::new(5000, 0),
                    Decimal::new(3000, 0),
                )
                .with_estimated_time("2-4 weeks")
                .with_includes(&["Waiver letter drafting", "iTax application", "Follow-up"]),
            ],
        }
    }

    /// Data analytics services
    pub fn data_analytics() -> Self {
        let category = ServiceCategory::DataAnalytics;
        Self {
            category,
            entries: vec![
                CatalogEntry::variable(
                    category,
                    "data-analysis",
                    "Data Analysis",
                    "Exploratory and statistical analysis of business data",
                    Decimal::new(15000, 0),
                    Decimal::new(10000, 0),
                )
                .with_estimated_time("1-2 weeks")
                .with_includes(&["Data audit", "Analysis report", "Findings walkthrough"]),
                CatalogEntry::variable(
                    category,
                    "dashboard-design",
                    "Dashboard Design",
                    "Interactive reporting dashboard tailored to your KPIs",
                    Decimal::new(20000, 0),
                    Decimal::new(15000, 0),
                )
                .with_estimated_time("2-3 weeks")
                .with_frequency(&["one-off", "quarterly refresh"]),
                CatalogEntry::fixed(
                    category,
                    "data-cleaning",
                    "Data Cleaning",
                    "De-duplication, normalization and validation of datasets",
                    Decimal::new(8000, 0),
                )
                .with_estimated_time("3-5 business days"),
            ],
        }
    }

    /// Business registration services
    pub fn business_registration() -> Self {
        let category = ServiceCategory::BusinessRegistration;
        Self {
            category,
            entries: vec![
                CatalogEntry::fixed(
                    category,
                    "business-name-registration",
                    "Business Name Registration",
                    "Name search and registration of a sole proprietorship",
                    Decimal::new(3500, 0),
                )
                .with_estimated_time("3-5 business days")
                .with_includes(&["Name search", "Registration certificate"]),
                CatalogEntry::fixed(
                    category,
                    "company-incorporation",
                    "Company Incorporation",
                    "Incorporation of a private limited company",
                    Decimal::new(25000, 0),
                )
                .with_estimated_time("1-2 weeks")
                .with_includes(&[
                    "Name search",
                    "Memorandum and articles",
                    "Certificate of incorporation",
                    "CR12",
                ]),
                CatalogEntry::fixed(
                    category,
                    "cr12-application",
                    "CR12 Application",
                    "Official company search and CR12 letter",
                    Decimal::new(3000, 0),
                )
                .with_estimated_time("2-3 business days"),
                CatalogEntry::fixed(
                    category,
                    "annual-returns",
                    "Annual Returns Filing",
                    "Preparation and filing of company annual returns",
                    Decimal::new(5000, 0),
                )
                .with_frequency(&["annual"]),
            ],
        }
    }

    /// Bookkeeping services
    pub fn bookkeeping() -> Self {
        let category = ServiceCategory::Bookkeeping;
        Self {
            category,
            entries: vec![
                CatalogEntry::variable(
                    category,
                    "monthly-bookkeeping",
                    "Monthly Bookkeeping",
                    "Transaction capture, reconciliations and monthly reports",
                    Decimal::new(12000, 0),
                    Decimal::new(8000, 0),
                )
                .with_frequency(&["monthly"])
                .with_includes(&["Bank reconciliation", "P&L and balance sheet", "VAT schedule"]),
                CatalogEntry::fixed(
                    category,
                    "payroll-processing",
                    "Payroll Processing",
                    "Monthly payroll with statutory deductions and payslips",
                    Decimal::new(6000, 0),
                )
                .with_frequency(&["monthly"]),
                CatalogEntry::variable(
                    category,
                    "audit-preparation",
                    "Audit Preparation",
                    "Year-end schedules and audit file preparation",
                    Decimal::new(30000, 0),
                    Decimal::new(20000, 0),
                )
                .with_frequency(&["annual"])
                .with_estimated_time("2-4 weeks"),
            ],
        }
    }

    /// Catalog for an arbitrary category
    pub fn for_category(category: ServiceCategory) -> Self {
        match category {
            ServiceCategory::Kra => Self::kra(),
            ServiceCategory::DataAnalytics => Self::data_analytics(),
            ServiceCategory::BusinessRegistration => Self::business_registration(),
            ServiceCategory::Bookkeeping => Self::bookkeeping(),
        }
    }
}
