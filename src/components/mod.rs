pub mod particle_network;
