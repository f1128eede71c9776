//! Selection engine: eligible pool, uniform draw and role attribution.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Hero};
use crate::error::Error;
use crate::role::{Role, RoleSet};

/// Hero names excluded from draws for the current session.
///
/// Bans are a per-session draft preference and are never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BanSet {
    names: BTreeSet<String>,
}

impl BanSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ban `name` if it is not banned, unban it otherwise. Returns whether it is now banned.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.names.remove(name) {
            false
        } else {
            self.names.insert(name.to_string());
            true
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for BanSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        BanSet {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// The winner of a draw and the lane it is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawResult {
    pub hero: Hero,
    pub attributed_role: Role,
}

/// No preference means any lane.
pub fn effective_roles(requested: &RoleSet) -> RoleSet {
    if requested.is_empty() {
        Role::all()
    } else {
        requested.clone()
    }
}

/// Heroes that are not banned and play at least one requested role, in catalog order.
///
/// An empty `requested` set matches every role.
pub fn eligible_pool<'a>(catalog: &'a Catalog, bans: &BanSet, requested: &RoleSet) -> Vec<&'a Hero> {
    let roles = effective_roles(requested);
    catalog
        .heroes()
        .iter()
        .filter(|h| !bans.contains(&h.name) && !h.roles.is_disjoint(&roles))
        .collect()
}

/// First role in canonical order shared by the hero and the request.
pub fn attributed_role(hero: &Hero, requested: &RoleSet) -> Option<Role> {
    let roles = effective_roles(requested);
    hero.roles.intersection(&roles).next().copied()
}

/// Draw one hero uniformly at random from the eligible pool.
pub fn draw<R: Rng + ?Sized>(
    catalog: &Catalog,
    bans: &BanSet,
    requested: &RoleSet,
    rng: &mut R,
) -> Result<DrawResult, Error> {
    let roles = effective_roles(requested);
    let pool: Vec<(&Hero, Role)> = eligible_pool(catalog, bans, &roles)
        .into_iter()
        .filter_map(|h| attributed_role(h, &roles).map(|r| (h, r)))
        .collect();
    if pool.is_empty() {
        return Err(Error::EmptyPool {
            roles: roles.into_iter().collect(),
            banned: bans.len(),
        });
    }

    let (winner, attributed_role) = pool[rng.gen_range(0..pool.len())];

    tracing::info!(
        hero = %winner.name,
        role = attributed_role.code(),
        pool = pool.len(),
        "drew hero"
    );

    Ok(DrawResult {
        hero: winner.clone(),
        attributed_role,
    })
}
