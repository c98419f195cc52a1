use clap::Args;
use serde_json::Value;

use revplan_core::plan::{
    allocate_plan, calculate_spillover, summarize_plan, AllocationInput, ContractPeriod,
    OneTimeCharge, RecurringContract, SpilloverInput, SummaryInput,
};
use revplan_core::types::YearMonth;

use crate::input;

/// Arguments for the 60-month auto-spread
#[derive(Args)]
pub struct AllocateArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Close month of the recurring contract (YYYY-MM)
    #[arg(long)]
    pub close_month: Option<String>,

    /// Recurring amount per month, in IDR
    #[arg(long)]
    pub monthly_amount: Option<i64>,

    /// Contract period in months (1-60) or OTC; the spread assumes 12 when unset
    #[arg(long)]
    pub period: Option<String>,

    /// One-time charge as YYYY-MM=amount (repeatable)
    #[arg(long = "otc")]
    pub otc: Vec<String>,
}

/// Arguments for quarter/half/FY totals
#[derive(Args)]
pub struct SummarizeArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Twelve comma-separated monthly amounts, January first
    #[arg(long, value_delimiter = ',')]
    pub months: Vec<i64>,
}

/// Arguments for the FY+1 spillover estimate
#[derive(Args)]
pub struct SpilloverArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Total contract value, in IDR
    #[arg(long)]
    pub contract_value: Option<i64>,

    /// Close month (YYYY-MM)
    #[arg(long)]
    pub close_month: Option<String>,

    /// Contract period in months (1-60) or OTC
    #[arg(long)]
    pub period: Option<String>,
}

fn parse_otc(raw: &str) -> Result<OneTimeCharge, Box<dyn std::error::Error>> {
    let (month, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("OTC '{raw}' must be YYYY-MM=amount"))?;
    let month: YearMonth = month.trim().parse()?;
    let amount: i64 = amount
        .trim()
        .parse()
        .map_err(|e| format!("OTC amount '{}': {}", amount.trim(), e))?;
    Ok(OneTimeCharge::new(month.to_string(), amount))
}

/// Allocation input built from flags, or `None` when no plan flag was given.
fn allocation_from_flags(
    args: &AllocateArgs,
) -> Result<Option<AllocationInput>, Box<dyn std::error::Error>> {
    let any_flag = args.close_month.is_some()
        || args.monthly_amount.is_some()
        || args.period.is_some()
        || !args.otc.is_empty();
    if !any_flag {
        return Ok(None);
    }
    let start_month = match args.close_month {
        Some(ref m) => m.parse::<YearMonth>()?.to_string(),
        None => String::new(),
    };
    let otc_entries = args
        .otc
        .iter()
        .map(|raw| parse_otc(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let period = args
        .period
        .as_deref()
        .map(str::parse::<ContractPeriod>)
        .transpose()?;
    Ok(Some(AllocationInput {
        otc_entries,
        recurring: RecurringContract {
            start_month,
            monthly_amount: args.monthly_amount.unwrap_or(0),
            period,
        },
    }))
}

pub fn run_allocate(args: AllocateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let from_flags = match args.input {
        Some(_) => None,
        None => allocation_from_flags(&args)?,
    };
    let alloc_input: AllocationInput = match from_flags {
        Some(from_flags) => from_flags,
        None => input::require(
            args.input.as_deref(),
            "allocation (or --close-month / --monthly-amount / --period / --otc)",
        )?,
    };
    let result = allocate_plan(&alloc_input);
    Ok(serde_json::to_value(result)?)
}

pub fn run_summarize(args: SummarizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let summary_input: SummaryInput = if args.months.is_empty() {
        input::require(args.input.as_deref(), "summary (or --months)")?
    } else {
        let months: [i64; 12] = args
            .months
            .as_slice()
            .try_into()
            .map_err(|_| format!("--months needs 12 values, got {}", args.months.len()))?;
        SummaryInput { months }
    };
    let result = summarize_plan(&summary_input);
    Ok(serde_json::to_value(result)?)
}

pub fn run_spillover(args: SpilloverArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let spill_input: SpilloverInput = if let Some(contract_value) = args.contract_value {
        SpilloverInput {
            contract_value,
            close_month: match args.close_month {
                Some(ref m) => m.parse::<YearMonth>()?.to_string(),
                None => String::new(),
            },
            period: args.period.as_deref().map(str::parse).transpose()?,
        }
    } else {
        input::require(args.input.as_deref(), "spillover (or --contract-value)")?
    };
    let result = calculate_spillover(&spill_input);
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args() -> AllocateArgs {
        AllocateArgs {
            input: None,
            close_month: None,
            monthly_amount: None,
            period: None,
            otc: vec![],
        }
    }

    #[test]
    fn test_no_plan_flags_reads_input() {
        assert!(allocation_from_flags(&args()).unwrap().is_none());
    }

    #[test]
    fn test_monthly_amount_alone_counts_as_flags() {
        let input = allocation_from_flags(&AllocateArgs {
            monthly_amount: Some(1_000),
            ..args()
        })
        .unwrap()
        .unwrap();
        assert_eq!(input.recurring.monthly_amount, 1_000);
        assert_eq!(input.recurring.start_month, "");
        assert_eq!(input.recurring.period, None);
    }

    #[test]
    fn test_period_flag_is_parsed_strictly() {
        let input = allocation_from_flags(&AllocateArgs {
            period: Some("24".into()),
            ..args()
        })
        .unwrap()
        .unwrap();
        assert_eq!(input.recurring.period, Some(ContractPeriod::Months(24)));
        assert!(allocation_from_flags(&AllocateArgs {
            period: Some("72".into()),
            ..args()
        })
        .is_err());
    }

    #[test]
    fn test_otc_flag_parses_month_and_amount() {
        let input = allocation_from_flags(&AllocateArgs {
            close_month: Some("2026-07".into()),
            otc: vec!["2026-03=500000".into()],
            ..args()
        })
        .unwrap()
        .unwrap();
        assert_eq!(input.otc_entries, vec![OneTimeCharge::new("2026-03", 500_000)]);
        assert_eq!(input.recurring.start_month, "2026-07");
    }
}
