mod common;

use campaign_runtime::{parse_script, CampaignSetting, CharacterFlags};
use editor_core::{
    build_editor_app, load_editor_config_from_env, run_frame, shutdown_editor, submit_command,
};

const PROMOTE_PRISONER: &str = "\
# promote the prisoner into a bodyguard
select 2
toggle prisoner
set follower on
set health 250
focus weapon
inc

# and hire a fast recruit
append
set speed 600
";

#[test]
fn scripted_session_round_trips_through_disk() -> anyhow::Result<()> {
    common::ensure_test_config();
    let (config, _) = load_editor_config_from_env();
    let commands = parse_script(PROMOTE_PRISONER)?;

    let mut app = build_editor_app(common::load_fixture_campaign(), config);
    for command in commands {
        submit_command(&mut app, command);
    }
    run_frame(&mut app);
    let setting = shutdown_editor(app).expect("session present until shutdown");

    let bodyguard = &setting.characters[2];
    assert_eq!(bodyguard.flags, CharacterFlags::GOOD_GUY | CharacterFlags::FOLLOWER);
    assert_eq!(bodyguard.health, 250);
    assert_eq!(bodyguard.gun, 1);
    assert_eq!(setting.characters.len(), 4);
    assert_eq!(setting.characters[3].speed, 512);

    let path = std::env::temp_dir().join(format!(
        "char_editor_script_{}.json",
        std::process::id()
    ));
    setting.save_to_file(&path)?;
    let reloaded = CampaignSetting::from_file(&path)?;
    std::fs::remove_file(&path)?;
    assert_eq!(reloaded, setting);
    assert_eq!(reloaded.title, "Ogre Valley");
    Ok(())
}

#[test]
fn script_errors_name_the_line() {
    let err = parse_script("select 1\nset health lots\n").unwrap_err();
    assert!(err.to_string().starts_with("line 2:"), "{err}");
}
