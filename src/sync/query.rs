//! Query-string encoding of a [`ParameterSet`].

use tracing::debug;
use url::form_urlencoded;

use crate::projection::params::{Edit, Field, ParameterSet};

/// Query key carrying the admin credential.
pub const ADMIN_KEY: &str = "admin";

/// Strips a single leading `?`.
fn trim_query(query: &str) -> &str {
    query.strip_prefix('?').unwrap_or(query)
}

/// Merges recognized keys of `query` into `params`.
///
/// Only the first occurrence of a key counts. Unknown keys and values that
/// don't parse for their field are skipped and leave the existing value in
/// place. Returns the number of fields overwritten.
pub fn merge_query(params: &mut ParameterSet, query: &str) -> usize {
    let mut seen: Vec<Field> = Vec::with_capacity(Field::ALL.len());
    let mut applied = 0;

    for (key, value) in form_urlencoded::parse(trim_query(query).as_bytes()) {
        let Some(field) = Field::from_query_key(&key) else {
            continue;
        };
        if seen.contains(&field) {
            continue;
        }
        seen.push(field);

        match Edit::parse(field, &value) {
            Some(edit) => {
                params.apply(edit);
                applied += 1;
            }
            None => debug!(key = %key, value = %value, "ignoring unparseable query value"),
        }
    }

    applied
}

/// Parses `query` on top of `defaults`.
///
/// # Examples
///
/// ```
/// use solar_savings::projection::params::ParameterSet;
/// use solar_savings::sync::query::parse_query;
///
/// let p = parse_query(&ParameterSet::default(), "?usage=9000&ur=oops");
/// assert_eq!(p.usage, 9000.0);
/// assert_eq!(p.utility_rate, 0.38);
/// ```
pub fn parse_query(defaults: &ParameterSet, query: &str) -> ParameterSet {
    let mut params = defaults.clone();
    merge_query(&mut params, query);
    params
}

/// Serializes every field of `params` into a query string (no leading `?`).
///
/// Numbers use the shortest representation that parses back to the same
/// value. `battery` is always written, `1` or `0`, so the link reproduces
/// the scenario even under defaults that enable it. The admin credential is
/// never part of the output.
pub fn to_query(params: &ParameterSet) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());
    for field in Field::ALL {
        match field {
            Field::IncludeBattery => {
                let flag = if params.include_battery { "1" } else { "0" };
                out.append_pair(field.query_key(), flag);
            }
            Field::View => {
                out.append_pair(field.query_key(), params.view.as_str());
            }
            _ => {
                if let Some(v) = params.number(field) {
                    out.append_pair(field.query_key(), &v.to_string());
                }
            }
        }
    }
    out.finish()
}

/// First value of the admin key in `query`, if present.
pub fn admin_credential(query: &str) -> Option<String> {
    form_urlencoded::parse(trim_query(query).as_bytes())
        .find(|(k, _)| k == ADMIN_KEY)
        .map(|(_, v)| v.into_owned())
}
