//! # carom-io
//!
//! Snapshot serialization: the particle state as a directory of
//! self-describing NumPy `.npy` files, one per quantity, matching the
//! layout produced by the configuration generator and consumed by the
//! post-processing tools.
//!
//! A snapshot directory holds `iter` (scalar u64), `time` (scalar f64),
//! `lengths` (vector of the domain extents), `nparticles` (scalar u64),
//! `densities` and `radii` (one entry per particle), and `positions_{d}`
//! and `velocities_{d}` for every dimension `d`.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use ndarray::{Array0, Array1, arr0};
use ndarray_npy::{ReadNpyExt, WriteNpyExt};

use carom_particle::{NDIMS, Particle, Vector};

mod error;

pub use error::SnapshotError;

pub type Result<T> = std::result::Result<T, SnapshotError>;

/// The full simulation state as structure-of-arrays, as stored on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Number of events processed when the state was captured.
    pub iter: u64,
    /// Simulated time of the capture.
    pub time: f64,
    /// Domain extents.
    pub lengths: Vector,
    /// Mass density per particle.
    pub densities: Array1<f64>,
    /// Radius per particle.
    pub radii: Array1<f64>,
    /// Position components, one array per dimension.
    pub positions: Vec<Array1<f64>>,
    /// Velocity components, one array per dimension.
    pub velocities: Vec<Array1<f64>>,
}

impl Snapshot {
    /// Loads a snapshot from a directory of `.npy` files.
    ///
    /// # Error
    ///
    /// Returns [`SnapshotError`] when a file is missing or malformed, or
    /// when an array length disagrees with `nparticles` or the compiled
    /// dimensionality.
    pub fn load(directory: &Path) -> Result<Self> {
        let iter = read_scalar::<u64>(directory, "iter")?;
        let time = read_scalar::<f64>(directory, "time")?;

        let lengths_data = read_vector(directory, "lengths")?;
        if lengths_data.len() != NDIMS {
            return Err(SnapshotError::Shape {
                name: "lengths".to_owned(),
                expected: NDIMS,
                found: lengths_data.len(),
            });
        }
        let mut lengths = [0.0; NDIMS];
        for dim in 0..NDIMS {
            lengths[dim] = lengths_data[dim];
        }

        let nparticles = read_scalar::<u64>(directory, "nparticles")? as usize;
        let densities = read_particle_vector(directory, "densities", nparticles)?;
        let radii = read_particle_vector(directory, "radii", nparticles)?;
        let mut positions = Vec::with_capacity(NDIMS);
        let mut velocities = Vec::with_capacity(NDIMS);
        for dim in 0..NDIMS {
            positions.push(read_particle_vector(
                directory,
                &format!("positions_{dim}"),
                nparticles,
            )?);
            velocities.push(read_particle_vector(
                directory,
                &format!("velocities_{dim}"),
                nparticles,
            )?);
        }

        Ok(Self {
            iter,
            time,
            lengths,
            densities,
            radii,
            positions,
            velocities,
        })
    }

    /// Writes the snapshot into the directory, creating it (and its
    /// parents) when missing; an already existing directory is fine.
    pub fn write(&self, directory: &Path) -> Result<()> {
        fs::create_dir_all(directory).map_err(|source| SnapshotError::Create {
            path: directory.to_path_buf(),
            source,
        })?;

        write_array(directory, "iter", &arr0(self.iter))?;
        write_array(directory, "time", &arr0(self.time))?;
        write_array(
            directory,
            "lengths",
            &Array1::from_iter(self.lengths.iter().copied()),
        )?;
        write_array(directory, "nparticles", &arr0(self.nparticles() as u64))?;
        write_array(directory, "densities", &self.densities)?;
        write_array(directory, "radii", &self.radii)?;
        for dim in 0..NDIMS {
            write_array(directory, &format!("positions_{dim}"), &self.positions[dim])?;
            write_array(
                directory,
                &format!("velocities_{dim}"),
                &self.velocities[dim],
            )?;
        }
        Ok(())
    }

    pub fn nparticles(&self) -> usize {
        self.densities.len()
    }

    /// Expands the structure-of-arrays into particles, all stamped with
    /// the snapshot time as their local time.
    pub fn to_particles(&self) -> Vec<Particle> {
        (0..self.nparticles())
            .map(|n| {
                let mut position = [0.0; NDIMS];
                let mut velocity = [0.0; NDIMS];
                for dim in 0..NDIMS {
                    position[dim] = self.positions[dim][n];
                    velocity[dim] = self.velocities[dim][n];
                }
                Particle {
                    density: self.densities[n],
                    radius: self.radii[n],
                    position,
                    velocity,
                    time: self.time,
                }
            })
            .collect()
    }

    /// Captures the particle population, which the caller has advanced to
    /// a common time, as a snapshot.
    pub fn from_particles(iter: u64, time: f64, lengths: Vector, particles: &[Particle]) -> Self {
        let mut positions = vec![Vec::with_capacity(particles.len()); NDIMS];
        let mut velocities = vec![Vec::with_capacity(particles.len()); NDIMS];
        for particle in particles {
            for dim in 0..NDIMS {
                positions[dim].push(particle.position[dim]);
                velocities[dim].push(particle.velocity[dim]);
            }
        }
        Self {
            iter,
            time,
            lengths,
            densities: particles.iter().map(|p| p.density).collect(),
            radii: particles.iter().map(|p| p.radius).collect(),
            positions: positions.into_iter().map(Array1::from_vec).collect(),
            velocities: velocities.into_iter().map(Array1::from_vec).collect(),
        }
    }
}

/// The save directory of one iteration: `<root>/save/iter<10 digits>`.
pub fn save_directory(output_root: &Path, iter: u64) -> PathBuf {
    output_root.join("save").join(format!("iter{iter:010}"))
}

fn open(directory: &Path, name: &str) -> Result<File> {
    let path = directory.join(format!("{name}.npy"));
    File::open(&path).map_err(|source| SnapshotError::Open { path, source })
}

fn read_scalar<T>(directory: &Path, name: &str) -> Result<T>
where
    Array0<T>: ReadNpyExt,
{
    let file = open(directory, name)?;
    let scalar = Array0::<T>::read_npy(file).map_err(|source| SnapshotError::Read {
        name: name.to_owned(),
        source,
    })?;
    Ok(scalar.into_scalar())
}

fn read_vector(directory: &Path, name: &str) -> Result<Array1<f64>> {
    let file = open(directory, name)?;
    Array1::<f64>::read_npy(file).map_err(|source| SnapshotError::Read {
        name: name.to_owned(),
        source,
    })
}

fn read_particle_vector(directory: &Path, name: &str, nparticles: usize) -> Result<Array1<f64>> {
    let data = read_vector(directory, name)?;
    if data.len() != nparticles {
        return Err(SnapshotError::Shape {
            name: name.to_owned(),
            expected: nparticles,
            found: data.len(),
        });
    }
    Ok(data)
}

fn write_array<A>(directory: &Path, name: &str, array: &A) -> Result<()>
where
    A: WriteNpyExt,
{
    let path = directory.join(format!("{name}.npy"));
    let file = File::create(&path).map_err(|source| SnapshotError::Open { path, source })?;
    array.write_npy(file).map_err(|source| SnapshotError::Write {
        name: name.to_owned(),
        source,
    })
}
