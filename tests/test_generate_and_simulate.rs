use conveyor_transport::table::NumberLocale;
use conveyor_transport::{ComplexTransportSystem, DataGenerator, Settings, TransportSystemConfig};

use rstest::*;

mod common;

const STEPS: usize = 200;

fn generate(settings: &Settings) -> conveyor_transport::Result<()> {
    let generator = DataGenerator::from_app(&settings.app);
    for path in settings.app.init_transport_system_files.keys() {
        generator.generate(&TransportSystemConfig::load(path)?, &settings.table_format())?;
    }
    Ok(())
}

#[rstest]
#[case("en")]
#[case("ru_RU")]
fn test_generate_and_simulate(#[case] locale: &str) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let settings_path = common::copy_sample_data(dir.path());

    let mut settings = Settings::load(&settings_path)?;
    settings.app.locale = NumberLocale::new(locale);
    settings.save(&settings_path)?;
    let settings = Settings::load(&settings_path)?;
    let locale = &settings.app.locale;

    generate(&settings)?;
    let split_init = dir.path().join("out/split-init.csv");
    assert_eq!(common::read_column(&split_init, "tau", locale).len(), STEPS);
    let first_split = common::read_column(&split_init, "1.connections.2", locale);
    let second_split = common::read_column(&split_init, "1.connections.3", locale);
    for (first, second) in first_split.iter().zip(&second_split) {
        assert!((first + second - 1.0).abs() < 2e-3);
    }

    ComplexTransportSystem::new(&settings)?.run()?;

    let line_result = dir.path().join("out/line-result.csv");
    let split_result = dir.path().join("out/split-result.csv");
    for (path, ids) in [(&line_result, vec![1, 2]), (&split_result, vec![1, 2, 3])] {
        assert_eq!(common::read_column(path, "tau", locale).len(), STEPS);
        for id in ids {
            let capacity = common::read_column(path, &format!("{id}.bunker-capacity"), locale);
            assert_eq!(capacity.len(), STEPS);
            assert!(capacity.iter().all(|capacity| *capacity >= 0.0));
            assert_eq!(
                common::read_column(path, &format!("{id}.outputFlow"), locale).len(),
                STEPS
            );
        }
    }

    // The split system only runs over [6, 12).
    let speed = common::read_column(&split_result, "1.speed", locale);
    assert_eq!(speed[59], 0.0);
    assert_eq!(speed[60], 2.0);
    assert_eq!(speed[119], 2.0);
    assert_eq!(speed[120], 0.0);

    let output = common::read_column(&split_result, "1.outputFlow", locale);
    let first_input = common::read_column(&split_result, "2.bunker-input-flow", locale);
    let second_input = common::read_column(&split_result, "3.bunker-input-flow", locale);
    for step in 60..120 {
        let routed = first_input[step] + second_input[step];
        assert!(
            (routed - output[step]).abs() <= 2e-3 * output[step].abs() + 3e-3,
            "step {step}: routed {routed}, output {}",
            output[step]
        );
    }
    Ok(())
}

#[test]
fn test_simulate_without_initial_data() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let settings_path = common::copy_sample_data(dir.path());
    let settings = Settings::load(&settings_path)?;

    // Without generated data there are neither split fractions nor speeds.
    let result = ComplexTransportSystem::new(&settings).and_then(|mut complex| complex.run());
    assert!(matches!(
        result,
        Err(conveyor_transport::Error::MissingSplitFunction { .. })
    ));
    Ok(())
}
