//! Embedded sample table, the terminal fallback tier.
//!
//! Thirty daily rows spanning January to mid-February 2024, already in
//! canonical form. Dates are kept in their mixed source formats.

use super::schema::CanonicalTable;
use std::sync::OnceLock;

/// Number of rows in the embedded sample.
pub const SAMPLE_ROWS: usize = 30;

const SAMPLE_CSV: &str = "\
Date,Open,High,Low,Close,Volume
2024-01-02,185.23,186.45,184.12,185.89,45678900
2024-01-03,185.90,187.34,185.01,186.78,52345600
01/04/2024,186.80,188.90,186.23,188.45,48901234
01/05/2024,188.50,189.67,187.89,188.12,41234567
2024-01-08,188.10,189.23,186.45,187.34,39876543
2024-01-09,187.40,188.56,186.78,188.23,43210987
01-10-2024,188.30,190.12,188.01,189.90,55678901
01-11-2024,189.95,191.23,189.34,190.45,61234567
2024/01/12,190.50,192.34,190.12,191.89,58901234
2024/01/16,191.90,193.45,191.23,192.78,49876543
\"Jan 17, 2024\",192.80,194.12,192.34,193.56,52345678
\"Jan 18, 2024\",193.60,195.23,193.01,194.67,48765432
2024-01-19,194.70,196.45,194.12,195.89,54321098
2024-01-22,195.90,197.34,195.23,196.45,47890123
01/23/2024,196.50,198.12,196.01,197.78,51234567
01/24/2024,197.80,199.45,197.23,198.90,56789012
2024-01-25,199.00,200.34,198.56,199.78,62345678
2024-01-26,199.80,201.23,199.12,200.45,58901234
01-29-2024,200.50,202.12,200.01,201.67,54567890
01-30-2024,201.70,203.45,201.23,202.89,59876543
2024/01/31,202.90,204.34,202.45,203.56,63210987
2024/02/01,203.60,205.12,203.01,204.23,57654321
\"Feb 02, 2024\",204.30,206.45,203.89,205.67,52109876
\"Feb 05, 2024\",205.70,207.23,205.12,206.45,48765432
2024-02-06,206.50,208.12,206.01,207.34,55432109
2024-02-07,207.40,209.45,206.89,208.78,61098765
02/08/2024,208.80,210.34,208.23,209.56,57654321
02/09/2024,209.60,211.23,209.01,210.45,53210987
2024-02-12,210.50,212.12,210.01,211.67,59876543
2024-02-13,211.70,213.45,211.23,212.34,65432109
";

static SAMPLE: OnceLock<CanonicalTable> = OnceLock::new();

/// The embedded sample table, parsed on first use.
pub fn sample_table() -> &'static CanonicalTable {
    SAMPLE.get_or_init(|| {
        CanonicalTable::from_csv(SAMPLE_CSV).expect("embedded sample data is valid canonical CSV")
    })
}
