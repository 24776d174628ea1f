use crate::{
    db::store::Store,
    libs::{
        blocker::{normalize_domain, normalize_url},
        config::{Config, ConfigPatch},
        host::StoreRuleSink,
        messages::Message,
        view::View,
    },
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    command: Option<SitesCommand>,
}

#[derive(Debug, Subcommand)]
enum SitesCommand {
    /// Block a domain during work phases
    Block {
        /// Domain or URL, e.g. youtube.com
        site: String,
    },
    /// Stop blocking a domain
    Unblock {
        /// Domain or URL
        site: String,
    },
    /// Keep a URL reachable even if its domain is blocked
    Allow {
        /// URL prefix, e.g. https://youtube.com/playlist?list=abc
        url: String,
    },
    /// Remove a URL from the allow list
    Disallow {
        /// URL prefix
        url: String,
    },
    /// List blocked sites and allowed URLs
    List,
    /// Check whether a URL is blocked right now
    Check {
        /// Full URL
        url: String,
    },
}

pub fn cmd(args: SitesArgs) -> Result<()> {
    let store = Store::new()?;
    match args.command {
        Some(SitesCommand::Block { site }) => block(&store, &site).map(|_| ()),
        Some(SitesCommand::Unblock { site }) => unblock(&store, &site).map(|_| ()),
        Some(SitesCommand::Allow { url }) => allow(&store, &url).map(|_| ()),
        Some(SitesCommand::Disallow { url }) => disallow(&store, &url).map(|_| ()),
        Some(SitesCommand::Check { url }) => check(&store, &url).map(|_| ()),
        Some(SitesCommand::List) | None => list(&store),
    }
}

/// Adds `site` to the block list. Returns whether the list changed.
pub fn block(store: &Store, site: &str) -> Result<bool> {
    let domain = match normalize_domain(site) {
        Ok(domain) => domain,
        Err(e) => {
            msg_error!(Message::InvalidSite(e.to_string()));
            return Ok(false);
        }
    };

    let mut sites = Config::load(store).blocked_sites;
    if sites.contains(&domain) {
        msg_info!(Message::SiteAlreadyBlocked(domain));
        return Ok(false);
    }

    sites.push(domain.clone());
    save_blocked(store, sites)?;
    msg_success!(Message::SiteBlocked(domain));
    Ok(true)
}

pub fn unblock(store: &Store, site: &str) -> Result<bool> {
    let domain = normalize_domain(site).unwrap_or_else(|_| site.trim().to_lowercase());

    let mut sites = Config::load(store).blocked_sites;
    let before = sites.len();
    sites.retain(|blocked| *blocked != domain);
    if sites.len() == before {
        msg_error!(Message::SiteNotBlocked(domain));
        return Ok(false);
    }

    save_blocked(store, sites)?;
    msg_success!(Message::SiteUnblocked(domain));
    Ok(true)
}

pub fn allow(store: &Store, url: &str) -> Result<bool> {
    let url = normalize_url(url);
    if url.is_empty() {
        msg_error!(Message::InvalidSite(url));
        return Ok(false);
    }

    let mut urls = Config::load(store).allowed_urls;
    if urls.contains(&url) {
        msg_info!(Message::UrlAlreadyAllowed(url));
        return Ok(false);
    }

    urls.push(url.clone());
    save_allowed(store, urls)?;
    msg_success!(Message::UrlAllowed(url));
    Ok(true)
}

pub fn disallow(store: &Store, url: &str) -> Result<bool> {
    let url = normalize_url(url);

    let mut urls = Config::load(store).allowed_urls;
    let before = urls.len();
    urls.retain(|allowed| *allowed != url);
    if urls.len() == before {
        msg_error!(Message::UrlNotAllowed(url));
        return Ok(false);
    }

    save_allowed(store, urls)?;
    msg_success!(Message::UrlDisallowed(url));
    Ok(true)
}

/// Evaluates `url` against the rules the watcher has installed. Outside a
/// work phase no rules are installed and nothing is blocked.
pub fn check(store: &Store, url: &str) -> Result<bool> {
    let rules = StoreRuleSink::installed(store)?;
    let blocked = match rules.is_blocked(url) {
        Ok(blocked) => blocked,
        Err(e) => {
            msg_error!(Message::InvalidSite(e.to_string()));
            return Ok(false);
        }
    };

    if blocked {
        msg_info!(Message::UrlIsBlocked(url.to_string()));
    } else {
        msg_info!(Message::UrlIsNotBlocked(url.to_string()));
    }
    Ok(blocked)
}

fn list(store: &Store) -> Result<()> {
    let config = Config::load(store);
    if config.blocked_sites.is_empty() {
        msg_info!(Message::NoBlockedSites);
    }
    if config.allowed_urls.is_empty() {
        msg_info!(Message::NoAllowedUrls);
    }
    if config.blocked_sites.is_empty() && config.allowed_urls.is_empty() {
        return Ok(());
    }

    msg_print!(format!("Sites ({} blocked, {} allowed)", config.blocked_sites.len(), config.allowed_urls.len()), true);
    View::sites(&config.blocked_sites, &config.allowed_urls)?;
    Ok(())
}

fn save_blocked(store: &Store, sites: Vec<String>) -> Result<()> {
    ConfigPatch {
        blocked_sites: Some(sites),
        ..Default::default()
    }
    .save(store)
}

fn save_allowed(store: &Store, urls: Vec<String>) -> Result<()> {
    ConfigPatch {
        allowed_urls: Some(urls),
        ..Default::default()
    }
    .save(store)
}
