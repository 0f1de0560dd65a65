//! Diagnostics tables appended under `output/log`.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use carom_engine::Engine;
use carom_particle::NDIMS;

/// Appendable text tables tracking event and registration counts, total
/// momentum and total kinetic energy over the run.
///
/// Momentum and energy lines report the deviation from the values captured
/// at the first logged instant, so conservation errors read directly off
/// the files.
#[derive(Debug)]
pub struct DiagnosticsLog {
    root: PathBuf,
    momenta0: Option<[f64; NDIMS]>,
    energy0: Option<f64>,
}

impl DiagnosticsLog {
    /// Creates the log directory (an existing one is fine).
    pub fn new(root: PathBuf) -> std::io::Result<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            momenta0: None,
            energy0: None,
        })
    }

    /// Appends one line to every table.
    pub fn append(&mut self, time: f64, engine: &Engine) -> std::io::Result<()> {
        self.append_line("nevents.dat", &format!("{time:.3e} {:16}", engine.event_count()))?;
        self.append_line(
            "nparticles.dat",
            &format!("{time:.3e} {:16}", engine.registration_count()),
        )?;
        self.append_momenta(time, engine)?;
        self.append_energy(time, engine)
    }

    fn append_momenta(&mut self, time: f64, engine: &Engine) -> std::io::Result<()> {
        let momenta = engine.momentum();
        let baseline = *self.momenta0.get_or_insert(momenta);
        let mut line = format!("{time:.3e}");
        for dim in 0..NDIMS {
            line.push_str(&format!(" {:.3e}", momenta[dim] - baseline[dim]));
        }
        self.append_line("momenta.dat", &line)
    }

    fn append_energy(&mut self, time: f64, engine: &Engine) -> std::io::Result<()> {
        let energy = engine.kinetic_energy();
        let baseline = *self.energy0.get_or_insert(energy);
        self.append_line(
            "energy.dat",
            &format!("{time:.3e} {energy:.3e} {:.3e}", energy - baseline),
        )
    }

    fn append_line(&self, name: &str, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.root.join(name))?;
        writeln!(file, "{line}")
    }
}

#[cfg(test)]
mod test {
    use carom_engine::EngineParams;
    use carom_particle::{Particle, Restitution};

    use super::*;

    #[test]
    fn test_tables_and_baselines() {
        let directory = tempfile::tempdir().unwrap();
        let mut log = DiagnosticsLog::new(directory.path().to_path_buf()).unwrap();

        let mut position = [5.0; NDIMS];
        position[0] = 3.0;
        let mut velocity = [0.0; NDIMS];
        velocity[0] = 1.0;
        let particles = vec![Particle {
            density: 1.0,
            radius: 1.0,
            position,
            velocity,
            time: 0.0,
        }];
        let engine = Engine::new(
            [10.0; NDIMS],
            particles,
            EngineParams {
                tmax: 100.0,
                restitution: Restitution::default(),
            },
        )
        .unwrap();

        log.append(0.0, &engine).unwrap();
        log.append(1.0, &engine).unwrap();

        for name in ["nevents.dat", "nparticles.dat", "momenta.dat", "energy.dat"] {
            let content = fs::read_to_string(directory.path().join(name)).unwrap();
            assert_eq!(content.lines().count(), 2, "{name}");
        }
        // unchanged state: deviations stay zero
        let momenta = fs::read_to_string(directory.path().join("momenta.dat")).unwrap();
        let last = momenta.lines().last().unwrap();
        assert!(last.split_whitespace().skip(1).all(|v| v.parse::<f64>().unwrap() == 0.0));
    }
}
