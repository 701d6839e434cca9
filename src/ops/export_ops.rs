use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::cache;
use crate::config::Config;
use crate::directory::DirectoryClient;
use crate::error::ExportResult;
use crate::model::Member;
use crate::vcard::{self, Photo};

/// Counters for the end-of-run summary.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportStats {
    pub written: usize,
    pub skipped: usize,
    pub without_photo: usize,
}

/// The whole pipeline: roster (cache or API), filter, roster CSV, then one
/// card file per member in roster order. The fetch completes fully before
/// any rendering begins; a fetch failure produces no output at all.
pub fn run_export(config: &Config) -> ExportResult<ExportStats> {
    let client = DirectoryClient::new(config.api_url_or_default(), config.token.clone());
    let cache_dir = config.cache_dir_or_default();

    let members = match cache::load(&cache_dir) {
        Some(members) => members,
        None => {
            let members = client.list_members()?;
            if let Err(e) = cache::store(&cache_dir, &members) {
                warn!("could not write roster cache: {}", e);
            }
            members
        }
    };

    let members = filter_members(members, config.include_bots, config.ignore_title_or_default());

    let output_dir = config.output_dir_or_default();
    fs::create_dir_all(&output_dir)?;
    write_roster_csv(&members, &output_dir)?;

    write_cards(&members, &output_dir, |member| fetch_photo(&client, member))
}

/// Drop deleted members, bot accounts (unless requested), and members who
/// opted out via the ignore marker in their title.
pub fn filter_members(members: Vec<Member>, include_bots: bool, ignore_title: &str) -> Vec<Member> {
    members
        .into_iter()
        .filter(|m| !m.deleted)
        .filter(|m| include_bots || !m.is_bot_account())
        .filter(|m| m.title.as_deref() != Some(ignore_title))
        .collect()
}

/// Render and write one card per member, in order. Photo fetching is
/// injected so the writer can run without a network in tests.
///
/// A member with no usable name is skipped with a warning; every other
/// failure aborts the run.
pub fn write_cards<F>(
    members: &[Member],
    output_dir: &Path,
    mut fetch_photo: F,
) -> ExportResult<ExportStats>
where
    F: FnMut(&Member) -> Option<Photo>,
{
    let mut stats = ExportStats::default();
    for member in members {
        let file_name = match vcard::file_name(member) {
            Ok(name) => name,
            Err(e) => {
                warn!("skipping member {}: {}", member.id, e);
                stats.skipped += 1;
                continue;
            }
        };

        let photo = fetch_photo(member);
        if member.avatar_url.is_some() && photo.is_none() {
            stats.without_photo += 1;
        }

        let card = vcard::render(member, photo.as_ref())?;
        let path = output_dir.join(&file_name);
        println!("Writing {}", path.display());
        fs::write(&path, card)?;
        stats.written += 1;
    }
    Ok(stats)
}

/// One-line-per-member summary written next to the cards.
pub fn write_roster_csv(members: &[Member], output_dir: &Path) -> ExportResult<()> {
    let mut writer = csv::Writer::from_path(output_dir.join("contacts.csv"))?;
    writer.write_record(["id", "username", "name", "email", "phone", "title"])?;
    for m in members {
        writer.write_record([
            m.id.as_str(),
            m.username.as_str(),
            m.export_name().unwrap_or(""),
            m.email.as_deref().unwrap_or(""),
            m.phone.as_deref().unwrap_or(""),
            m.title.as_deref().unwrap_or(""),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// An avatar failure degrades the card instead of failing the record.
fn fetch_photo(client: &DirectoryClient, member: &Member) -> Option<Photo> {
    let url = member.avatar_url.as_deref()?;
    match client.fetch_avatar(url) {
        Ok(Some(bytes)) => Some(Photo::new(bytes, url)),
        Ok(None) => {
            debug!("member {} only has a stock avatar", member.id);
            None
        }
        Err(e) => {
            warn!("avatar download failed for {}: {}", member.id, e);
            None
        }
    }
}
