//! Replica Site Reader
//!
//! Reads the `<multisite>` section listing peer sites. Only replica sites
//! are returned; each carries the connection attributes of its own
//! `<database>` section.
//!
//! ```xml
//! <Setup>
//!   <multisite>
//!     <site role="master"><database server="10.0.0.1"/></site>
//!     <site role="slave"><database server="10.0.0.2" port="5432"/></site>
//!   </multisite>
//! </Setup>
//! ```

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::document::{load_document, Element};
use crate::error::{CompileError, SetupError};

use super::compiler::DATABASE_ELEMENT;
use super::database::DatabaseConfig;

/// Element listing the peer sites.
pub const MULTISITE_ELEMENT: &str = "multisite";

/// Role values that mark a replica site.
const REPLICA_ROLES: &[&str] = &["slave", "replica", "secondary"];

/// A replica site and its database connection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub role: String,
    pub database: DatabaseConfig,
}

/// Returns true if a role attribute marks a replica site.
pub fn is_replica_role(role: &str) -> bool {
    let role = role.trim();
    REPLICA_ROLES.iter().any(|r| r.eq_ignore_ascii_case(role))
}

/// Collects the replica sites of a document.
///
/// Children without a replica `role` are skipped. A replica without a
/// `<database>` section is an error.
pub fn read_sites(root: &Element) -> Result<Vec<Site>, CompileError> {
    let multisite = root.required_child(MULTISITE_ELEMENT)?;

    let mut sites = Vec::new();
    for site in multisite.children() {
        let Some(role) = site.attribute("role").filter(|r| is_replica_role(r)) else {
            debug!("Skipping <{}> without a replica role", site.name());
            continue;
        };

        let database = site.required_child(DATABASE_ELEMENT)?;
        sites.push(Site {
            role: role.to_string(),
            database: DatabaseConfig::from_element(database),
        });
    }

    info!("Found {} replica sites", sites.len());
    Ok(sites)
}

/// Reads the replica sites from an XML file.
pub fn load_sites(path: &str) -> Result<Vec<Site>, SetupError> {
    let root = load_document(path)?;
    Ok(read_sites(&root)?)
}
