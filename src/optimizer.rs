use ndarray::{Array1, Array2};
use serde::{Serialize, Deserialize};

/// Parameter update rule applied layer by layer.
///
/// `begin_step` is called once per optimization step before the per-layer
/// updates, so stateful optimizers can advance their timestep.
pub trait Optimizer {
    fn begin_step(&mut self) {}
    fn update_weights(
        &mut self,
        layer: usize,
        weights: &mut Array2<f32>,
        gradients: &Array2<f32>,
        learning_rate: f32,
    );
    fn update_biases(
        &mut self,
        layer: usize,
        biases: &mut Array1<f32>,
        gradients: &Array1<f32>,
        learning_rate: f32,
    );
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
}

impl Optimizer for OptimizerWrapper {
    fn begin_step(&mut self) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.begin_step(),
            OptimizerWrapper::Adam(optimizer) => optimizer.begin_step(),
        }
    }

    fn update_weights(
        &mut self,
        layer: usize,
        weights: &mut Array2<f32>,
        gradients: &Array2<f32>,
        learning_rate: f32,
    ) {
        match self {
            OptimizerWrapper::SGD(optimizer) => {
                optimizer.update_weights(layer, weights, gradients, learning_rate)
            }
            OptimizerWrapper::Adam(optimizer) => {
                optimizer.update_weights(layer, weights, gradients, learning_rate)
            }
        }
    }

    fn update_biases(
        &mut self,
        layer: usize,
        biases: &mut Array1<f32>,
        gradients: &Array1<f32>,
        learning_rate: f32,
    ) {
        match self {
            OptimizerWrapper::SGD(optimizer) => {
                optimizer.update_biases(layer, biases, gradients, learning_rate)
            }
            OptimizerWrapper::Adam(optimizer) => {
                optimizer.update_biases(layer, biases, gradients, learning_rate)
            }
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Default for SGD {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer for SGD {
    fn update_weights(
        &mut self,
        _layer: usize,
        weights: &mut Array2<f32>,
        gradients: &Array2<f32>,
        learning_rate: f32,
    ) {
        weights.zip_mut_with(gradients, |w, &g| *w -= learning_rate * g);
    }

    fn update_biases(
        &mut self,
        _layer: usize,
        biases: &mut Array1<f32>,
        gradients: &Array1<f32>,
        learning_rate: f32,
    ) {
        biases.zip_mut_with(gradients, |b, &g| *b -= learning_rate * g);
    }
}

/// Adam with first and second moment estimates kept per layer. Moments are
/// allocated on the first update of each layer.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    pub t: i32,
    m_weights: Vec<Array2<f32>>,
    v_weights: Vec<Array2<f32>>,
    m_biases: Vec<Array1<f32>>,
    v_biases: Vec<Array1<f32>>,
}

impl Adam {
    pub fn new(beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            t: 0,
            m_weights: Vec::new(),
            v_weights: Vec::new(),
            m_biases: Vec::new(),
            v_biases: Vec::new(),
        }
    }

    fn ensure_weights(&mut self, layer: usize, dim: (usize, usize)) {
        while self.m_weights.len() <= layer {
            self.m_weights.push(Array2::zeros((0, 0)));
            self.v_weights.push(Array2::zeros((0, 0)));
        }
        if self.m_weights[layer].dim() != dim {
            self.m_weights[layer] = Array2::zeros(dim);
            self.v_weights[layer] = Array2::zeros(dim);
        }
    }

    fn ensure_biases(&mut self, layer: usize, len: usize) {
        while self.m_biases.len() <= layer {
            self.m_biases.push(Array1::zeros(0));
            self.v_biases.push(Array1::zeros(0));
        }
        if self.m_biases[layer].len() != len {
            self.m_biases[layer] = Array1::zeros(len);
            self.v_biases[layer] = Array1::zeros(len);
        }
    }

    fn bias_corrections(&self) -> (f32, f32) {
        let t = self.t.max(1);
        (1.0 - self.beta1.powi(t), 1.0 - self.beta2.powi(t))
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(0.9, 0.999, 1e-8)
    }
}

impl Optimizer for Adam {
    fn begin_step(&mut self) {
        self.t += 1;
    }

    fn update_weights(
        &mut self,
        layer: usize,
        weights: &mut Array2<f32>,
        gradients: &Array2<f32>,
        learning_rate: f32,
    ) {
        self.ensure_weights(layer, weights.dim());
        let (c1, c2) = self.bias_corrections();
        let (beta1, beta2, eps) = (self.beta1, self.beta2, self.epsilon);

        let m = &mut self.m_weights[layer];
        let v = &mut self.v_weights[layer];
        m.zip_mut_with(gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        v.zip_mut_with(gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

        ndarray::Zip::from(weights).and(&*m).and(&*v).for_each(|w, &m, &v| {
            *w -= learning_rate * (m / c1) / ((v / c2).sqrt() + eps);
        });
    }

    fn update_biases(
        &mut self,
        layer: usize,
        biases: &mut Array1<f32>,
        gradients: &Array1<f32>,
        learning_rate: f32,
    ) {
        self.ensure_biases(layer, biases.len());
        let (c1, c2) = self.bias_corrections();
        let (beta1, beta2, eps) = (self.beta1, self.beta2, self.epsilon);

        let m = &mut self.m_biases[layer];
        let v = &mut self.v_biases[layer];
        m.zip_mut_with(gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        v.zip_mut_with(gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

        ndarray::Zip::from(biases).and(&*m).and(&*v).for_each(|b, &m, &v| {
            *b -= learning_rate * (m / c1) / ((v / c2).sqrt() + eps);
        });
    }
}
