use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A company mentioned on a page.
///
/// Every scalar is optional: the model is told to drop anything it is not
/// sure about, so partial records are normal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Company {
    /// Legal or commonly used company name
    pub name: Option<String>,

    /// Four-digit year the company was founded
    pub founded_year: Option<i32>,

    /// Industry or market the company operates in
    pub industry: Option<String>,

    /// Annual revenue in US dollars
    pub revenue: Option<i64>,

    /// Number of employees
    pub employees: Option<i64>,

    /// Cities or countries where the company has offices
    #[serde(default)]
    pub locations: Vec<String>,

    /// Technologies the company is known to use
    #[serde(default)]
    pub tech_stack: Vec<String>,
}
