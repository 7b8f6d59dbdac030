use desking_core::DeskingProfile;
use tracing::debug;

use crate::input::file;

/// Load the dealer profile from `path`, or the built-in defaults when unset.
pub fn load_profile(path: Option<&str>) -> Result<DeskingProfile, Box<dyn std::error::Error>> {
    let profile = match path {
        Some(path) => {
            let profile: DeskingProfile = file::read_typed(path)?;
            debug!(path, name = %profile.name, "loaded dealer profile");
            profile
        }
        None => DeskingProfile::default(),
    };
    profile.validate()?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("desk-{}-{name}", std::process::id()));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_no_path_gives_defaults() {
        assert_eq!(load_profile(None).unwrap(), DeskingProfile::default());
    }

    #[test]
    fn test_yaml_profile() {
        let path = write_temp(
            "profile.yaml",
            "name: Northgate Auto\nsales_tax_rate: 6.25\ndoc_fee: 150\nalternate_terms: [36, 60]\n",
        );
        let profile = load_profile(path.to_str()).unwrap();
        assert_eq!(profile.name, "Northgate Auto");
        assert_eq!(profile.sales_tax_rate, dec!(6.25));
        assert_eq!(profile.doc_fee, dec!(150));
        assert_eq!(profile.alternate_terms, vec![36, 60]);
        assert_eq!(profile.loan_term, 72);
    }

    #[test]
    fn test_json_profile_validated() {
        let path = write_temp("bad.json", r#"{ "interest_rate": -2 }"#);
        let err = load_profile(path.to_str()).unwrap_err();
        assert!(err.to_string().contains("interest_rate"));
    }
}
