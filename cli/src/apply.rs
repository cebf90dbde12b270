#![deny(missing_docs)]

//! # Apply Command
//!
//! The single pipeline this binary performs:
//! locate -> read -> patch -> report -> write back.
//!
//! Patch mismatches are reported skips; only target lookup and the final
//! filesystem round-trip are fatal.

use accom_patch_core::locator::locate_single;
use accom_patch_core::patcher::{apply_rules, PatchOutcome};
use accom_patch_core::recipe::{profile_upload_rules, DASHBOARD_FILE_NAME};
use accom_patch_core::{AppError, AppResult};
use std::fs;
use std::path::PathBuf;

/// Arguments for the patch run.
#[derive(clap::Args, Debug, Clone)]
pub struct ApplyArgs {
    /// Directory the recursive search for the dashboard file starts from.
    #[clap(long, default_value = ".")]
    pub root: PathBuf,

    /// File name to locate under the search root.
    #[clap(long, default_value = DASHBOARD_FILE_NAME)]
    pub file_name: String,

    /// Accept the first match when several files share the name.
    /// Without this flag, an ambiguous lookup fails listing every candidate.
    #[clap(long)]
    pub take_first: bool,
}

/// Executes the patch run.
///
/// # Arguments
///
/// * `args` - Command arguments (search root, target name, ambiguity policy).
pub fn execute(args: &ApplyArgs) -> AppResult<()> {
    // 1. Locate. Fails before anything is written.
    let path = locate_single(&args.root, &args.file_name, args.take_first)?;
    println!("Patching {:?}...", path);

    // 2. Read the whole file into the working buffer.
    let content = fs::read_to_string(&path)
        .map_err(|e| AppError::General(format!("Failed to read file {:?}: {}", path, e)))?;

    // 3. Apply the rule sequence.
    let (patched, reports) = apply_rules(&content, &profile_upload_rules());

    for report in &reports {
        match report.outcome {
            PatchOutcome::Applied => println!("  -> Applied {}", report.rule),
            PatchOutcome::AlreadyPresent => {
                println!("  -> {} already present, skipping", report.rule)
            }
            PatchOutcome::NeedleMissing => {
                println!("  -> {} block not found, skipping", report.rule)
            }
        }
    }

    // 4. Write back in place, only when something changed.
    if patched != content {
        fs::write(&path, &patched)
            .map_err(|e| AppError::General(format!("Failed to write file {:?}: {}", path, e)))?;
    } else {
        println!("  -> No changes needed");
    }

    println!("Done: {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use accom_patch_core::recipe;
    use tempfile::tempdir;

    /// Minimal dashboard snapshot carrying all three needles.
    fn unpatched_dashboard() -> String {
        let mut s = String::new();
        s.push_str("class _AccommodationMerchantDashboardState extends State<AccommodationMerchantDashboard> {\n");
        s.push_str(recipe::UPLOAD_ANCHOR);
        s.push_str("\n    return await ref.getDownloadURL();\n  }\n\n");
        s.push_str(recipe::OLD_PICK_AND_UPLOAD);
        s.push_str("\n\n  Future<void> _removeProfilePhoto() async {\n");
        s.push_str("    try {\n      await user.updatePhotoURL(null);\n");
        s.push_str(recipe::OLD_REMOVE_PHOTO_BLOCK);
        s.push_str("\n    } catch (_) {}\n  }\n}\n");
        s
    }

    fn args_for(root: &std::path::Path, take_first: bool) -> ApplyArgs {
        ApplyArgs {
            root: root.to_path_buf(),
            file_name: DASHBOARD_FILE_NAME.to_string(),
            take_first,
        }
    }

    #[test]
    fn test_execute_patches_dashboard_in_place() {
        let dir = tempdir().unwrap();
        let screens = dir.path().join("lib").join("screens");
        fs::create_dir_all(&screens).unwrap();
        let target = screens.join(DASHBOARD_FILE_NAME);
        fs::write(&target, unpatched_dashboard()).unwrap();

        execute(&args_for(dir.path(), false)).unwrap();

        let patched = fs::read_to_string(&target).unwrap();
        assert!(patched.contains("_uploadProfileViaBackend(XFile file)"));
        assert!(!patched.contains(recipe::OLD_PICK_AND_UPLOAD));
        assert!(patched.contains(recipe::NEW_PICK_AND_UPLOAD));
        assert!(patched.contains(recipe::NEW_REMOVE_PHOTO_BLOCK));

        // Second run is a no-op: guards fire and the bytes stay put.
        execute(&args_for(dir.path(), false)).unwrap();
        let again = fs::read_to_string(&target).unwrap();
        assert_eq!(again, patched);
    }

    #[test]
    fn test_execute_missing_target_fails_before_any_write() {
        let dir = tempdir().unwrap();

        let err = execute(&args_for(dir.path(), false)).unwrap_err();
        assert!(matches!(err, AppError::TargetNotFound(_)));

        // Nothing was created under the root.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_execute_ambiguous_target_requires_take_first() {
        let dir = tempdir().unwrap();
        for sub in ["a", "b"] {
            let d = dir.path().join(sub);
            fs::create_dir_all(&d).unwrap();
            fs::write(d.join(DASHBOARD_FILE_NAME), unpatched_dashboard()).unwrap();
        }

        let err = execute(&args_for(dir.path(), false)).unwrap_err();
        assert!(matches!(err, AppError::AmbiguousTarget(_)));

        execute(&args_for(dir.path(), true)).unwrap();
    }

    #[test]
    fn test_execute_diverged_file_is_left_unchanged() {
        let dir = tempdir().unwrap();
        let target = dir.path().join(DASHBOARD_FILE_NAME);
        // A file that carries none of the needles, e.g. a newer upstream version.
        let diverged = "class Dashboard {\n  // rewritten upstream\n}\n";
        fs::write(&target, diverged).unwrap();

        execute(&args_for(dir.path(), false)).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), diverged);
    }
}
