use syn::{Attribute, Error, LitStr};

// The `#[depot("...")]` annotation of one field, if any.
pub fn field_tag(attrs: &[Attribute]) -> Result<Option<LitStr>, Error> {
    let mut found: Option<LitStr> = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("depot")) {
        let lit: LitStr = attr.parse_args()?;
        if found.is_some() {
            return Err(Error::new_spanned(attr, "duplicate #[depot(...)] attribute"));
        }

        validate(&lit)?;
        found = Some(lit);
    }

    Ok(found)
}

// Unknown keywords are ignored; only `index:` roles can be malformed.
fn validate(lit: &LitStr) -> Result<(), Error> {
    let tag = lit.value();
    if tag == "-" {
        return Ok(());
    }

    for token in tag.split(',').skip(1).map(str::trim) {
        if !token.starts_with("index:") {
            continue;
        }

        let parts: Vec<&str> = token.split(':').collect();
        if parts.len() != 3 {
            return Err(Error::new_spanned(
                lit,
                format!("malformed index role `{token}`, expected index:<name>:pk|sk"),
            ));
        }
        if !matches!(parts[2], "pk" | "sk") {
            return Err(Error::new_spanned(
                lit,
                format!("index role `{token}` must end in :pk or :sk"),
            ));
        }
    }

    Ok(())
}
